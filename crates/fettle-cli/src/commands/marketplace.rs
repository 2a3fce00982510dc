//! Marketplace command implementation

use fettle_claude::PluginActions;

use super::CommandOutput;
use crate::error::Result;
use crate::output;

/// Pull the latest manifests of every known marketplace.
pub fn run_marketplace_refresh<A: PluginActions>(actions: &A) -> Result<CommandOutput> {
    match actions.refresh_marketplaces() {
        Ok(()) => Ok(CommandOutput::success(format!(
            "{} Marketplaces refreshed",
            output::present()
        ))),
        Err(e) => Ok(CommandOutput::failure(format!(
            "Failed to refresh marketplaces: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fettle_test_utils::FakeBackend;

    #[test]
    fn test_refresh() {
        colored::control::set_override(false);
        let backend = FakeBackend::new("/p");

        let result = run_marketplace_refresh(&backend).unwrap();
        assert_eq!(result.output, "✓ Marketplaces refreshed");
        assert_eq!(backend.refreshes(), 1);
    }
}
