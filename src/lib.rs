pub mod core {
    pub mod config;
    pub mod error;
    pub mod outcome;
    pub mod runner;
    pub mod stats;
    pub mod suite;
    pub mod trace;
}


pub mod demo;
pub mod reporters;
