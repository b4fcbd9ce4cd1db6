pub mod fetcher;

pub use fetcher::SignalClient;
