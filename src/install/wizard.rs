//! Interactive prompts and terminal output for `rr-bootstrap`

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use inquire::Confirm;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::pipeline::InstalledBinary;

/// Ask before replacing an existing file. Defaults to "no".
pub fn confirm_overwrite(path: &Path) -> Result<bool> {
    Confirm::new(&format!("{} already exists. Overwrite it?", path.display()))
        .with_default(false)
        .prompt()
        .map_err(|e| anyhow::anyhow!("Prompt cancelled: {}", e))
}

/// Print the installed binary summary
pub fn show_installed(binary: &InstalledBinary) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = writeln!(stdout, "✓ RoadRunner {} installed", binary.version);
    let _ = stdout.reset();

    let _ = writeln!(stdout, "  Location: {}", binary.path.display());
    let _ = writeln!(stdout, "  Platform: {}", binary.platform);
    let _ = writeln!(stdout, "  Size:     {:.1} MB", binary.size as f64 / 1_048_576.0);
    if let Some(mode) = binary.mode {
        let _ = writeln!(stdout, "  Mode:     {mode:o}");
    }
}

/// Print a single green success line
pub fn show_success(message: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
    let _ = writeln!(stdout, "✓ {message}");
    let _ = stdout.reset();
}

/// Print a yellow notice (e.g. user declined an overwrite)
pub fn show_skipped(message: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
    let _ = writeln!(stdout, "⚠ {message}");
    let _ = stdout.reset();
}

/// Print a red error block on stderr
pub fn show_error(err: &anyhow::Error) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = writeln!(stderr, "❌ {err}");
    let _ = stderr.reset();
    for cause in err.chain().skip(1) {
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
        let _ = writeln!(stderr, "   caused by: {cause}");
        let _ = stderr.reset();
    }
}
