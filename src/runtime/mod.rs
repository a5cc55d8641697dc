pub mod server;
pub mod startup;

pub use server::run_server;
