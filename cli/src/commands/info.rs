use dialr_common::config::Config;
use dialr_core::enumerate;

use crate::backend;
use crate::terminal::print;

pub fn info(cfg: &Config) -> anyhow::Result<()> {
    let api = backend::backend();

    if cfg.quiet == 0 {
        print::centerln("a safe dialer over the native connection API");
    }
    print::aligned_line("Version", env!("CARGO_PKG_VERSION"));
    print::aligned_line("Backend", "simulated native dialer");
    print::aligned_line(
        "Entries",
        enumerate::enumerate_entries(api.as_ref(), None)?.len(),
    );
    print::aligned_line("Devices", enumerate::enumerate_devices(api.as_ref())?.len());
    print::aligned_line(
        "Connections",
        enumerate::enumerate_connections(api.as_ref())?.len(),
    );
    Ok(())
}
