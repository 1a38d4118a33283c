//! Workspace-level tests that drive a whole scan through `scanr-core`.

#[cfg(test)]
mod scan;
