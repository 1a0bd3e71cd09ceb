//! Merchant command handlers.

use offsetcf_core::{Console, Merchant, MerchantForm, MerchantPatch};

use crate::cli::{GlobalOpts, MerchantsArgs, MerchantsCommand};
use crate::config::Profile;
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(m: &Merchant) -> String {
    output::detail_lines(&[
        ("ID", m.id.clone()),
        ("Name", m.name.clone()),
        ("Email", m.email.clone()),
        ("Company", m.company.clone()),
        ("Website", m.website.clone().unwrap_or_else(|| "-".into())),
        ("Created", m.created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ("Updated", m.updated_at.format("%Y-%m-%d %H:%M UTC").to_string()),
    ])
}

fn print_merchant(merchant: &Merchant, global: &GlobalOpts) {
    let out = output::render_single(&global.output, merchant, detail, |m| m.id.clone());
    output::print_output(&out, global.quiet);
}

pub async fn handle(
    console: &Console,
    args: MerchantsArgs,
    profile: &Profile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MerchantsCommand::Register {
            name,
            email,
            company,
            website,
        } => {
            let merchant = console
                .register_merchant(MerchantForm {
                    name,
                    email,
                    company,
                    website,
                })
                .await?;
            output::success(
                &format!(
                    "Merchant registered. Save it with: offsetcf config set merchant_id {}",
                    merchant.id
                ),
                global.quiet,
            );
            print_merchant(&merchant, global);
            Ok(())
        }

        MerchantsCommand::Get { id } => {
            let id = util::merchant_id(id, profile)?;
            let merchant = console.get_merchant(&id).await?;
            print_merchant(&merchant, global);
            Ok(())
        }

        MerchantsCommand::Update {
            id,
            name,
            email,
            company,
            website,
        } => {
            let id = util::merchant_id(id, profile)?;
            let patch = MerchantPatch {
                name,
                email,
                company,
                website,
            };
            if patch.is_empty() {
                return Err(CliError::MissingArgument {
                    what: "fields to update".into(),
                    hint: "Pass at least one of --name, --email, --company, --website".into(),
                });
            }
            let merchant = console.update_merchant(&id, patch).await?;
            output::success("Merchant updated", global.quiet);
            print_merchant(&merchant, global);
            Ok(())
        }
    }
}
