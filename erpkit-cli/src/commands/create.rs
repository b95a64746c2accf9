//! `erpkit create`: create a lookup option inline.

use erpkit_lib::ErpClient;
use erpkit_ui::combobox::{Combobox, CreateOutcome, Creator};

use crate::error::CliError;

/// Create `text` as a new option of `field` through `endpoint`.
///
/// The existing options are loaded first (from `list_endpoint`, defaulting
/// to `endpoint`) so duplicates are refused without a POST.
pub async fn create(
    client: &ErpClient,
    endpoint: &str,
    list_endpoint: Option<&str>,
    field: &str,
    text: &str,
) -> Result<(), CliError> {
    let mut combobox = Combobox::new(field)
        .remote(list_endpoint.unwrap_or(endpoint))
        .creator(Creator::endpoint(endpoint));

    if let Some(ticket) = combobox.begin_fetch() {
        let options = ticket.run(client).await?;
        combobox.finish_fetch(ticket, Ok(options));
    }
    combobox.input(text);

    match combobox.create(client).await {
        CreateOutcome::Created(option) => {
            println!("{}\t{}", option.label, option.value);
            Ok(())
        }
        CreateOutcome::Failed(message) => Err(CliError::Rejected(message)),
        CreateOutcome::Unavailable | CreateOutcome::Delegated(_) => Err(CliError::Rejected(
            format!("{text:?} is empty or already exists"),
        )),
    }
}
