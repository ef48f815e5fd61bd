pub mod a001_emergency;
pub mod a002_dref;
