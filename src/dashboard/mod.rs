mod cache;
mod refresh;
mod render;
mod server;

pub use cache::DashboardCache;
pub use refresh::Refresher;
pub use server::DashboardServer;
