use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use sprig::app_dirs::AppDir;
use sprig::logging::LOG_ENV;

/// `--version` banner listing the directories sprig reads and writes.
pub(super) fn long_version() -> &'static str {
	let describe = |dir: AppDir| match dir.resolve() {
		Ok(path) => format!("{} (${})", path.display(), dir.env_var()),
		Err(err) => format!("unavailable: {err}"),
	};
	let banner = format!(
		"{}\nconfig: {}\nsession log: {}\nlog filter: ${LOG_ENV}\n",
		env!("CARGO_PKG_VERSION"),
		describe(AppDir::Config),
		describe(AppDir::Cache),
	);
	Box::leak(banner.into_boxed_str())
}

pub(super) fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
		.usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
		.literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
		.placeholder(AnsiColor::Cyan.on_default())
		.error(AnsiColor::Red.on_default().effects(Effects::BOLD))
}
