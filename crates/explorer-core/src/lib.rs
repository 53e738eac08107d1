//! JSON boundary of the Zond explorer: validates backend records and turns
//! them into display-ready views using `zond_codec`.

pub mod error;
pub mod fields;
pub mod logging;
pub mod views;

use error::ExplorerError;
use views::View;

pub use logging::{init_tracing, LogConfig};
pub use views::{
    AddressActivityView, BlockView, DisplayAmount, TokenTransferView, TransactionView, ValidatorView,
};
pub use zond_codec;

/// Parses a backend record and builds its view.
pub fn parse_view<V: View>(json: &str) -> Result<V, ExplorerError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    V::from_json(&value)
}

/// Builds a view for every element of a JSON array of records.
///
/// Records that fail validation are logged and skipped so one bad row does
/// not blank the whole list.
pub fn parse_view_list<V: View>(json: &str) -> Result<Vec<V>, ExplorerError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let records = value
        .as_array()
        .ok_or_else(|| ExplorerError::InvalidField {
            field: "$".to_string(),
            reason: "expected a JSON array".to_string(),
        })?;

    Ok(views::collect_views(records))
}

/// Parses a backend record and serialises its view for the rendering layer.
pub fn render_view<V: View>(json: &str) -> Result<String, ExplorerError> {
    let view: V = parse_view(json)?;
    Ok(serde_json::to_string(&view)?)
}
