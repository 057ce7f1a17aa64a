//! Logging to the systemd user journal (`journalctl --user -t fazer -f`).

use log::{LevelFilter, Log, Metadata, Record};

const IDENTIFIER: &str = "fazer";

/// Passes this crate's records at info (debug when toggled on) and
/// everything else at warn.
struct FilteredJournal {
    inner: systemd_journal_logger::JournalLog,
}

/// Level admitted for a record target, given the debug toggle.
fn max_level_for(target: &str, debug: bool) -> LevelFilter {
    if target.starts_with(IDENTIFIER) {
        if debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    } else {
        LevelFilter::Warn
    }
}

impl Log for FilteredJournal {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= max_level_for(metadata.target(), crate::debug_logging())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the journal logger. Call once at startup.
pub fn init_logging(debug: bool) -> std::io::Result<()> {
    let journal = systemd_journal_logger::JournalLog::new()?
        .with_syslog_identifier(IDENTIFIER.to_string());

    crate::set_debug_logging(debug);

    log::set_boxed_logger(Box::new(FilteredJournal { inner: journal }))
        .map_err(std::io::Error::other)?;
    // Global max must be Debug so debug records can pass once toggled
    log::set_max_level(LevelFilter::Debug);
    Ok(())
}
