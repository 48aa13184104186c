pub mod backend;
pub mod normalize;

pub use backend::BackendClient;
