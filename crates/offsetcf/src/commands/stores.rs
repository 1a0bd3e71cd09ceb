//! Store and widget command handlers.

use tabled::Tabled;

use offsetcf_core::{Console, Store, StoreForm, StorePatch, WidgetPosition, WidgetTheme};

use crate::cli::{GlobalOpts, PositionArg, StoresArgs, StoresCommand, ThemeArg, WidgetArgs};
use crate::config::Profile;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StoreRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Widget")]
    widget: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Theme")]
    theme: String,
}

impl From<&Store> for StoreRow {
    fn from(s: &Store) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            domain: s.domain.clone(),
            widget: output::widget_status(s.widget_config.enabled),
            position: s.widget_config.position.to_string(),
            theme: s.widget_config.theme.to_string(),
        }
    }
}

fn detail(s: &Store) -> String {
    let w = &s.widget_config;
    output::detail_lines(&[
        ("ID", s.id.clone()),
        ("Name", s.name.clone()),
        ("Domain", s.domain.clone()),
        ("Widget", output::widget_status(w.enabled)),
        ("Position", w.position.to_string()),
        ("Theme", w.theme.to_string()),
        ("Primary color", w.primary_color.clone()),
        ("Text color", w.text_color.clone()),
        ("Message", w.custom_message.clone().unwrap_or_else(|| "-".into())),
    ])
}

fn print_store(store: &Store, global: &GlobalOpts) {
    let out = output::render_single(&global.output, store, detail, |s| s.id.clone());
    output::print_output(&out, global.quiet);
}

// ── Arg conversion ──────────────────────────────────────────────────

impl From<PositionArg> for WidgetPosition {
    fn from(p: PositionArg) -> Self {
        match p {
            PositionArg::TopLeft => Self::TopLeft,
            PositionArg::TopRight => Self::TopRight,
            PositionArg::BottomLeft => Self::BottomLeft,
            PositionArg::BottomRight => Self::BottomRight,
        }
    }
}

impl From<ThemeArg> for WidgetTheme {
    fn from(t: ThemeArg) -> Self {
        match t {
            ThemeArg::Light => Self::Light,
            ThemeArg::Dark => Self::Dark,
            ThemeArg::Auto => Self::Auto,
        }
    }
}

fn store_form(name: String, domain: String, widget: WidgetArgs) -> StoreForm {
    let defaults = StoreForm::default();
    StoreForm {
        name,
        domain,
        position: widget.position.map_or(defaults.position, Into::into),
        theme: widget.theme.map_or(defaults.theme, Into::into),
        primary_color: widget.primary_color.unwrap_or(defaults.primary_color),
        text_color: widget.text_color.unwrap_or(defaults.text_color),
        custom_message: widget.message,
    }
}

fn store_patch(name: Option<String>, domain: Option<String>, widget: WidgetArgs) -> StorePatch {
    StorePatch {
        name,
        domain,
        position: widget.position.map(Into::into),
        theme: widget.theme.map(Into::into),
        primary_color: widget.primary_color,
        text_color: widget.text_color,
        enabled: None,
        custom_message: widget.message,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: StoresArgs,
    profile: &Profile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let merchant_id = util::merchant_id(args.merchant, profile)?;

    match args.command {
        StoresCommand::List => {
            let stores = console.list_stores(&merchant_id).await?;
            let out = output::render_list(
                &global.output,
                &stores,
                |s| StoreRow::from(s),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StoresCommand::Create {
            name,
            domain,
            widget,
        } => {
            let store = console
                .create_store(&merchant_id, store_form(name, domain, widget))
                .await?;
            output::success(&format!("Store '{}' created", store.name), global.quiet);
            print_store(&store, global);
            Ok(())
        }

        StoresCommand::Update {
            store_id,
            name,
            domain,
            widget,
        } => {
            let patch = store_patch(name, domain, widget);
            if patch.is_empty() {
                return Err(CliError::MissingArgument {
                    what: "fields to update".into(),
                    hint: "Pass --name, --domain, or a widget flag such as --theme".into(),
                });
            }
            let store = console.update_store(&merchant_id, &store_id, patch).await?;
            output::success("Store updated", global.quiet);
            print_store(&store, global);
            Ok(())
        }

        StoresCommand::Delete { store_id } => {
            if !util::confirm(
                &format!("Delete store '{store_id}'? Its widget stops collecting opt-ins."),
                global.yes,
            )? {
                return Ok(());
            }
            console.delete_store(&store_id).await?;
            output::success("Store deleted", global.quiet);
            Ok(())
        }

        StoresCommand::Enable { store_id } => {
            let store = console.set_widget_enabled(&merchant_id, &store_id, true).await?;
            output::success(&format!("Widget enabled on {}", store.domain), global.quiet);
            Ok(())
        }

        StoresCommand::Disable { store_id } => {
            let store = console.set_widget_enabled(&merchant_id, &store_id, false).await?;
            output::success(&format!("Widget disabled on {}", store.domain), global.quiet);
            Ok(())
        }
    }
}
