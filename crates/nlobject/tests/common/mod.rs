//! Common test utilities for integration tests.

use std::sync::Once;

use nlobject::genl::{GenlFamily, GenlOpFlags};

static TRACING: Once = Once::new();

/// Install a test log subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// The control family as the kernel reports it.
pub fn nlctrl() -> GenlFamily {
    let mut family = GenlFamily::new();
    family.set_id(0x10);
    family.set_name("nlctrl");
    family.set_version(2);
    family.set_hdrsize(0);
    family.set_maxattr(10);
    family.add_op(3, GenlOpFlags::CMD_CAP_DO | GenlOpFlags::CMD_CAP_DUMP);
    family.add_op(10, GenlOpFlags::CMD_CAP_DUMP);
    family.add_group(0x10, "notify");
    family
}
