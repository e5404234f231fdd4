pub mod audio;
pub mod fetch;
pub mod separate;
pub mod transcode;
