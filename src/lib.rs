pub mod annotation;
pub mod ase;
pub mod canon;
pub mod classify;
pub mod cli;
pub mod ctx;
pub mod dpsi;
pub mod error;
pub mod event;
pub mod input;
pub mod integrate;
pub mod io;
pub mod math;
pub mod novelty;
pub mod pipeline;
pub mod schema;
pub mod table;
