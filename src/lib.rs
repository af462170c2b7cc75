pub mod record;
pub mod value;
pub mod context;
pub mod sink;
pub mod enrich;
pub mod json_sink;
pub mod noop_sink;
pub mod capture;
pub mod logger;
pub mod correlation;
pub mod middleware;

pub mod init;
pub mod env;
