#![allow(dead_code)]

mod fake_cache;

pub use fake_cache::FakeCache;
pub use sidecar::{sample, RunningSidecar, SidecarConfig};
