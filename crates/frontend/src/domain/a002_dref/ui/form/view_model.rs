use contracts::domain::a002_dref::dto::{DrefRequest, DrefResponse, PlannedInterventionInput};
use leptos::prelude::*;
use uuid::Uuid;

use crate::domain::a002_dref::api::create_dref;
use crate::shared::form_errors::{FieldKey, FormError, FormErrorMap, KeyRules, NUM};

pub const PLANNED_INTERVENTIONS: &str = "planned_interventions";

/// Keys for the rows of a submitted form.
///
/// The server reports row errors by position; they are stored under the
/// row's `client_id` so they stay on the right row when rows move.
pub fn dref_key_rules(rows: &[PlannedInterventionInput]) -> KeyRules {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.client_id).collect();
    KeyRules::new().rule(vec![PLANNED_INTERVENTIONS.into(), NUM], move |idx| {
        ids.get(idx[0]).map(|id| FieldKey::from(*id))
    })
}

/// Checks done before anything is sent
pub fn validate(form: &DrefRequest) -> FormErrorMap {
    let mut errors = FormErrorMap::default();
    if form.title.trim().is_empty() {
        errors.fields.insert(
            "title".into(),
            FormError::Message("Title is required".to_string()),
        );
    }
    errors
}

/// Number input; empty or unparsable text clears the value
pub fn parse_optional_number(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

#[derive(Clone, Copy)]
pub struct DrefFormViewModel {
    pub form: RwSignal<DrefRequest>,
    pub errors: RwSignal<FormErrorMap>,
    pub is_saving: RwSignal<bool>,
    pub saved: RwSignal<Option<DrefResponse>>,
}

impl DrefFormViewModel {
    pub fn new() -> Self {
        let form = DrefRequest {
            planned_interventions: vec![PlannedInterventionInput::new_row()],
            ..DrefRequest::default()
        };
        Self {
            form: RwSignal::new(form),
            errors: RwSignal::new(FormErrorMap::default()),
            is_saving: RwSignal::new(false),
            saved: RwSignal::new(None),
        }
    }

    pub fn add_row(&self) {
        self.form
            .update(|f| f.planned_interventions.push(PlannedInterventionInput::new_row()));
    }

    pub fn remove_row(&self, client_id: Uuid) {
        self.form
            .update(|f| f.planned_interventions.retain(|row| row.client_id != client_id));
    }

    pub fn update_row(&self, client_id: Uuid, edit: impl FnOnce(&mut PlannedInterventionInput)) {
        self.form.update(|f| {
            if let Some(row) = f
                .planned_interventions
                .iter_mut()
                .find(|row| row.client_id == client_id)
            {
                edit(row);
            }
        });
    }

    pub fn row_ids(&self) -> Vec<Uuid> {
        self.form
            .with(|f| f.planned_interventions.iter().map(|row| row.client_id).collect())
    }

    pub fn banner(&self) -> Option<String> {
        self.errors.with(|e| e.non_field_error.clone())
    }

    pub fn field_error(&self, field: &str) -> Option<String> {
        self.errors.with(|e| e.message(field).map(str::to_string))
    }

    /// Message shown above a row
    pub fn row_banner(&self, client_id: Uuid) -> Option<String> {
        self.errors.with(|e| {
            e.nested(PLANNED_INTERVENTIONS)
                .and_then(|rows| rows.nested(client_id))
                .and_then(|row| row.non_field_error.clone())
        })
    }

    pub fn row_error(&self, client_id: Uuid, field: &str) -> Option<String> {
        self.errors.with(|e| {
            e.message_at(&[PLANNED_INTERVENTIONS.into(), client_id.into(), field.into()])
                .map(str::to_string)
        })
    }

    pub fn save_command(&self) {
        let current = self.form.get_untracked();

        let local = validate(&current);
        if !local.is_empty() {
            self.errors.set(local);
            return;
        }

        self.errors.set(FormErrorMap::default());
        self.is_saving.set(true);

        let vm = *self;
        leptos::task::spawn_local(async move {
            match create_dref(&current).await {
                Ok(created) => {
                    log::info!("DREF application {} created", created.id);
                    vm.saved.set(Some(created));
                }
                Err(e) => {
                    // rows as they were sent, not as they are now
                    let rules = dref_key_rules(&current.planned_interventions);
                    vm.errors.set(e.form_errors(&|location| rules.resolve(location)));
                }
            }
            vm.is_saving.set(false);
        });
    }
}

impl Default for DrefFormViewModel {
    fn default() -> Self {
        Self::new()
    }
}
