use colored::*;
use dialr_common::config::Config;
use dialr_core::enumerate;

use crate::backend;
use crate::terminal::print;

pub fn connections(_cfg: &Config) -> anyhow::Result<()> {
    let api = backend::backend();
    let connections = enumerate::enumerate_connections(api.as_ref())?;

    if connections.is_empty() {
        print::print_status("No active connections");
        return Ok(());
    }

    for (idx, connection) in connections.iter().enumerate() {
        print::tree_head(idx, &connection.entry_name);
        let address: ColoredString = match connection.client_address {
            Some(addr) => addr.to_string().normal(),
            None => "none".dimmed(),
        };
        print::as_tree_one_level(vec![
            ("Handle".to_string(), connection.handle.to_string().cyan()),
            ("Device".to_string(), connection.device_name.normal()),
            ("Kind".to_string(), connection.device_kind.to_string().cyan()),
            ("Address".to_string(), address),
        ]);
    }
    Ok(())
}
