mod checksum;
mod completions;
mod download;
mod resolve;
mod top;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use download::run_download;
pub use resolve::run_resolve;
pub use top::run_top;
