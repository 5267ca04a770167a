#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use sp_bind as bind;
pub use sp_cfg as cfg;
pub use sp_path as path;
pub use sp_policy as policy;
pub use sp_stream as stream;
pub use sp_utils as utils;
