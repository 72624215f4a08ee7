use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::catalog::SocRow;
use crate::store::MatchStore;
use crate::taxonomy::soc_code::{SocCode, SocLevel};

/// Lists the occupation codes one level below the parent selection.
///
/// Level 1 ignores `parent` and lists every major group. Pure read.
pub async fn resolve(
    store: &dyn MatchStore,
    level: i64,
    parent: Option<&str>,
) -> Result<Vec<SocRow>, AppError> {
    let level = SocLevel::from_number(level)?;
    let prefix = level.parent_prefix(parent)?;

    let rows = store.soc_codes_with_prefix(&prefix).await?;
    let mut children: Vec<SocRow> = rows
        .into_iter()
        .filter(|row| match row.soc_code.parse::<SocCode>() {
            Ok(code) => code.level() == level,
            Err(e) => {
                warn!("Skipping SOC row: {e}");
                false
            }
        })
        .collect();
    children.sort_by(|a, b| a.soc_code.cmp(&b.soc_code));

    debug!(
        "Resolved {} SOC codes at level {} under '{prefix}'",
        children.len(),
        level.number()
    );
    Ok(children)
}
