use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Installs the global subscriber once. `RUST_LOG` takes precedence over
/// `default_filter`. Output goes to stderr; stdout is reserved for JSON.
pub fn init(default_filter: &str) {
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter(default_filter))
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

fn filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_filters_fall_back_to_info() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(
            filter("warn").to_string(),
            EnvFilter::new("warn").to_string()
        );
        assert_eq!(
            filter("not a filter ===").to_string(),
            EnvFilter::new("info").to_string()
        );
    }

    #[test]
    fn init_is_idempotent() {
        init("error");
        init("not a filter ===");
        assert!(INIT.get().is_some());
    }
}
