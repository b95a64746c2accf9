//! `erpkit options`: fetch and filter lookup options.

use erpkit_lib::ErpClient;
use erpkit_ui::combobox::Combobox;

use super::parse_params;
use crate::error::CliError;

/// Load the options behind `endpoint`, optionally filtered by `query`.
///
/// With `pick`, the text is committed as a strict field would on blur and
/// the resulting value is printed instead.
pub async fn options(
    client: &ErpClient,
    endpoint: &str,
    params: &[String],
    query: Option<&str>,
    pick: Option<&str>,
) -> Result<(), CliError> {
    let mut field = Combobox::new("option")
        .remote(endpoint)
        .params(parse_params(params)?);

    if let Some(ticket) = field.begin_fetch() {
        let options = ticket.run(client).await?;
        field.finish_fetch(ticket, Ok(options));
    }

    if let Some(text) = pick {
        field.input(text);
        field.blur();
        match field.current_value() {
            Some(value) => println!("{value}"),
            None => return Err(CliError::Rejected(format!("{text:?} matches no option"))),
        }
        return Ok(());
    }

    if let Some(query) = query {
        field.input(query);
    }
    let mut count = 0;
    for option in field.filtered() {
        println!("{}\t{}", option.label, option.value);
        count += 1;
    }
    log::info!("Listed {} of {} options from {}", count, field.all_options().len(), endpoint);
    Ok(())
}
