use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use retrodesk::Desktop;
use retrodesk::config::{DesktopConfig, TermSize};
use retrodesk::debug_log::{DebugLogHandle, install_panic_hook, set_global_debug_log};
use retrodesk::drivers::OutputDriver;
use retrodesk::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use retrodesk::tracing_sub;

/// A retro desktop for the character terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Maximum gap between the two presses of a double-click, in milliseconds.
    #[arg(long, value_name = "MS")]
    double_click_ms: Option<u64>,

    /// Files at least this large (in MiB) are copied on the background worker.
    #[arg(long, value_name = "MIB")]
    long_op_mib: Option<u64>,

    /// How long to wait for input before redrawing, in milliseconds.
    #[arg(long, value_name = "MS")]
    poll_ms: Option<u64>,

    /// Use plain ASCII for icons, window controls and the desktop pattern.
    #[arg(long)]
    ascii: bool,

    /// List dot-files in folder windows.
    #[arg(long)]
    show_hidden: bool,

    /// Keep the clipboard in-process only.
    #[arg(long)]
    no_system_clipboard: bool,
}

impl Cli {
    fn config(&self) -> DesktopConfig {
        let mut config = DesktopConfig::default();
        if let Some(ms) = self.double_click_ms {
            config.double_click_interval = Duration::from_millis(ms);
        }
        if let Some(mib) = self.long_op_mib {
            config.long_operation_bytes = mib.saturating_mul(1024 * 1024);
        }
        if let Some(ms) = self.poll_ms {
            config.poll_interval = Duration::from_millis(ms);
        }
        config.ascii_icons = self.ascii;
        config.show_hidden = self.show_hidden;
        config.system_clipboard = !self.no_system_clipboard;
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log = DebugLogHandle::default();
    set_global_debug_log(log.clone());
    install_panic_hook();
    tracing_sub::init_default();

    let mut output = match ConsoleOutputDriver::new() {
        Ok(output) => output,
        Err(err) => {
            eprintln!("retrodesk: cannot open the terminal: {err}");
            return ExitCode::FAILURE;
        }
    };
    let size = match output.size() {
        Ok(area) => TermSize::new(area.width, area.height),
        Err(err) => {
            eprintln!("retrodesk: cannot read the terminal size: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut desktop = match Desktop::new(cli.config(), size) {
        Ok(desktop) => desktop.with_log(log),
        Err(err) => {
            eprintln!("retrodesk: {err}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(width = size.width, height = size.height, "desktop starting");
    match desktop.run(ConsoleInputDriver::new(), &mut output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("retrodesk: {err}");
            ExitCode::FAILURE
        }
    }
}
