use colored::*;
use dialr_common::config::Config;
use dialr_core::enumerate;

use crate::backend;
use crate::terminal::print;

pub fn devices(_cfg: &Config) -> anyhow::Result<()> {
    let api = backend::backend();
    let devices = enumerate::enumerate_devices(api.as_ref())?;

    if devices.is_empty() {
        print::print_status("No dial-capable devices present");
        return Ok(());
    }

    for (idx, device) in devices.iter().enumerate() {
        print::tree_head(idx, &device.name);
        print::as_tree_one_level(vec![(
            "Kind".to_string(),
            device.kind.to_string().cyan(),
        )]);
    }
    Ok(())
}
