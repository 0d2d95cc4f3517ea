pub mod relay;

pub use relay::RelayProvider;
