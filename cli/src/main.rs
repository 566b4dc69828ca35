mod backend;
mod commands;
mod terminal;

use commands::{CommandLine, Commands, connections, devices, dial, entries, info};
use dialr_common::config::Config;
use terminal::print;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    terminal::logging::init();

    let cfg = Config {
        quiet: commands.quiet,
    };
    print::banner(&cfg);

    match commands.command {
        Commands::Info => {
            print::header("about the tool", &cfg);
            info::info(&cfg)
        }
        Commands::Entries { phonebook } => {
            print::header("phonebook entries", &cfg);
            entries::entries(phonebook.as_deref(), &cfg)
        }
        Commands::Devices => {
            print::header("dial devices", &cfg);
            devices::devices(&cfg)
        }
        Commands::Connections => {
            print::header("active connections", &cfg);
            connections::connections(&cfg)
        }
        Commands::Dial {
            entry,
            user,
            password,
            timeout,
            phonebook,
        } => {
            print::header("dialing", &cfg);
            dial::dial(entry, user, password, timeout, phonebook, &cfg).await
        }
    }
}
