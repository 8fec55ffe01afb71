use std::io;

use roomconsole::types::*;
use roomconsole::{
    CollectionController, CollectionFetcher, ConsoleConfig, ConsoleError, ConsoleHttpClient,
    EditSession, EditState, Editable, Failure, FailureSite, FileField, HttpCollection,
    MultipartSettings, QueryState, Resource, StreamingSettingsForm,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::cli::{
    Cli, Collection, Command, EditArgs, EditableKind, EntityKind, ListArgs, OnConflict, ShowArgs,
    StreamingArgs,
};
use crate::error::CliError;
use crate::output::{self, Row};

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let client = connect(&cli)?;

    match cli.command {
        Command::List(args) => list(client, &args).await,
        Command::Show(args) => show(&client, &args).await,
        Command::Edit(args) => edit(&client, &args).await,
        Command::StreamingSettings(args) => streaming_settings(&client, &args).await,
    }
}

fn connect(cli: &Cli) -> Result<ConsoleHttpClient, CliError> {
    let url = cli.url.as_deref().ok_or(CliError::MissingUrl)?;
    let mut config = ConsoleConfig::new(url);
    if let Some(token) = &cli.token {
        config = config.with_token(token);
    }
    if let Some(locale) = &cli.locale {
        config = config.with_locale(locale);
    }
    info!(url = %config.base_url, "using console");
    Ok(ConsoleHttpClient::new(&config)?)
}

/// Route of a resource's index view in the web UI.
fn index_route(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Role => "/admin/roles",
        EntityKind::Server => "/admin/servers",
        EntityKind::ServerPool => "/admin/server_pools",
        EntityKind::User => "/admin/users",
        EntityKind::RoomType => "/admin/room_types",
    }
}

/// Log what the web UI would do about a failure.
fn report(failure: &Failure, index: &str) {
    let directive = &failure.directive;
    if let Some(toast) = &directive.toast {
        error!(status = ?toast.status, "{}", toast.message);
    }
    if let Some(nav) = &directive.navigate {
        warn!(route = %nav.route(index), "navigate");
    }
    if directive.retry {
        info!("run the command again to retry");
    }
}

// --- list ---

async fn list(client: ConsoleHttpClient, args: &ListArgs) -> Result<(), CliError> {
    let room = || args.room.as_deref().ok_or(CliError::MissingRoom("room collection"));

    match args.collection {
        Collection::Roles => list_resource::<Role>(client, args, EntityKind::Role).await,
        Collection::Servers => list_resource::<Server>(client, args, EntityKind::Server).await,
        Collection::ServerPools => {
            list_resource::<ServerPool>(client, args, EntityKind::ServerPool).await
        }
        Collection::Users => list_resource::<User>(client, args, EntityKind::User).await,
        Collection::RoomTypes => {
            list_resource::<RoomType>(client, args, EntityKind::RoomType).await
        }
        Collection::Recordings => {
            let room = room()?;
            let fetcher = HttpCollection::room_recordings(client, room);
            list_with(fetcher, Some("start"), args, &format!("/rooms/{room}#recordings")).await
        }
        Collection::Meetings => {
            let room = room()?;
            let fetcher = HttpCollection::room_meetings(client, room);
            list_with(fetcher, Some("start"), args, &format!("/rooms/{room}#history")).await
        }
        Collection::Members => {
            let room = room()?;
            let fetcher = HttpCollection::room_members(client, room);
            list_with(fetcher, Some("lastname"), args, &format!("/rooms/{room}#members")).await
        }
    }
}

async fn list_resource<R: Resource + Row>(
    client: ConsoleHttpClient,
    args: &ListArgs,
    kind: EntityKind,
) -> Result<(), CliError> {
    let fetcher = HttpCollection::<R>::for_resource(client);
    list_with(fetcher, R::DEFAULT_SORT, args, index_route(kind)).await
}

/// Build the query from the flags as the UI would from clicks.
fn query_from_args(default_sort: Option<&str>, args: &ListArgs) -> QueryState {
    let mut query = QueryState::new(default_sort);
    if let Some(column) = &args.sort_by {
        if query.sort_by() != Some(column.as_str()) {
            query.set_sort(column);
        }
    }
    if args.desc {
        if let Some(column) = query.sort_by().map(str::to_string) {
            query.set_sort(&column);
        }
    }
    if let Some(filter) = &args.filter {
        query.set_filter(filter);
    }
    query.set_page(args.page);
    query
}

async fn list_with<T: Row, F: CollectionFetcher<T>>(
    fetcher: F,
    default_sort: Option<&str>,
    args: &ListArgs,
    route: &str,
) -> Result<(), CliError> {
    let mut list = CollectionController::new(fetcher, default_sort)
        .with_query(query_from_args(default_sort, args))
        .with_return_path(route);

    if let Err(failure) = list.load().await {
        report(&failure, route);
        return Err(failure.into());
    }

    if list.query().page() != args.page {
        warn!(requested = args.page, shown = list.query().page(), "page no longer exists");
    }

    output::write_rows(list.items(), args.json, &mut io::stdout().lock())?;
    let summary = output::describe_page(list.pagination().as_ref(), list.empty_state());
    if !summary.is_empty() {
        eprintln!("{summary}");
    }
    Ok(())
}

// --- show ---

async fn show(client: &ConsoleHttpClient, args: &ShowArgs) -> Result<(), CliError> {
    match args.kind {
        EntityKind::Role => show_one::<Role>(client, args).await,
        EntityKind::Server => show_one::<Server>(client, args).await,
        EntityKind::ServerPool => show_one::<ServerPool>(client, args).await,
        EntityKind::User => show_one::<User>(client, args).await,
        EntityKind::RoomType => show_one::<RoomType>(client, args).await,
    }
}

async fn show_one<R: Resource<Id = u64> + Row>(
    client: &ConsoleHttpClient,
    args: &ShowArgs,
) -> Result<(), CliError> {
    let index = index_route(args.kind);
    let entity = match client.fetch_one::<R>(&args.id).await {
        Ok(entity) => entity,
        Err(e) => {
            let failure = Failure::new(e, FailureSite::EntityLoad, &format!("{index}/{}", args.id));
            report(&failure, index);
            return Err(failure.into());
        }
    };
    output::write_rows(std::slice::from_ref(&entity), args.json, &mut io::stdout().lock())
}

// --- edit ---

async fn edit(client: &ConsoleHttpClient, args: &EditArgs) -> Result<(), CliError> {
    match args.kind {
        EditableKind::Role => edit_one::<Role>(client, args, EntityKind::Role).await,
        EditableKind::Server => edit_one::<Server>(client, args, EntityKind::Server).await,
        EditableKind::ServerPool => {
            edit_one::<ServerPool>(client, args, EntityKind::ServerPool).await
        }
        EditableKind::User => edit_one::<User>(client, args, EntityKind::User).await,
    }
}

/// Apply `key=value` assignments to a draft. Values of string fields are
/// taken verbatim; others are read as JSON, falling back to a string.
fn apply_assignments<D>(draft: &mut D, assignments: &[(String, String)]) -> Result<(), CliError>
where
    D: serde::Serialize + serde::de::DeserializeOwned,
{
    let mut fields = match serde_json::to_value(&*draft)? {
        Value::Object(map) => map,
        _ => return Err(CliError::UnknownField(String::new())),
    };
    for (key, raw) in assignments {
        let slot = fields
            .get_mut(key)
            .ok_or_else(|| CliError::UnknownField(key.clone()))?;
        *slot = match slot {
            Value::String(_) => Value::String(raw.clone()),
            _ => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone())),
        };
    }
    *draft = serde_json::from_value(Value::Object(fields))?;
    Ok(())
}

async fn edit_one<R: Editable<Id = u64> + Row>(
    client: &ConsoleHttpClient,
    args: &EditArgs,
    kind: EntityKind,
) -> Result<(), CliError> {
    let index = index_route(kind);
    let route = format!("{index}/{}/edit", args.id);

    let entity = client.fetch_one::<R>(&args.id).await.map_err(|e| {
        let failure = Failure::new(e, FailureSite::EntityLoad, &route);
        report(&failure, index);
        CliError::from(failure)
    })?;

    let mut session = EditSession::new(entity).with_return_path(&route);
    apply_assignments(session.draft_mut()?, &args.assignments)?;

    let mut directive = session.save(client).await?;

    if directive.conflict {
        let name = session
            .conflicting_entity()
            .map(Resource::display_name)
            .unwrap_or_default();
        match args.on_conflict {
            OnConflict::Abort => return Err(CliError::Conflict(name)),
            OnConflict::Reload => {
                session.reload()?;
                warn!(entity = R::LABEL, name = %session.display_name(), "local edits discarded");
                return output::write_rows(
                    std::slice::from_ref(session.entity()),
                    false,
                    &mut io::stdout().lock(),
                );
            }
            OnConflict::Overwrite => {
                directive = session.resolve_overwrite(client).await?;
                if directive.conflict {
                    return Err(CliError::Conflict(name));
                }
            }
        }
    }

    match session.state() {
        EditState::Saved => {
            info!(entity = R::LABEL, name = %session.display_name(), "saved");
            output::write_rows(
                std::slice::from_ref(session.entity()),
                false,
                &mut io::stdout().lock(),
            )
        }
        EditState::ValidationFailed => {
            for (field, messages) in session.field_errors() {
                for message in messages {
                    eprintln!("{field}: {message}");
                }
            }
            Err(CliError::Invalid)
        }
        _ => {
            if let Some(toast) = &directive.toast {
                error!(status = ?toast.status, "{}", toast.message);
            }
            if let Some(nav) = &directive.navigate {
                warn!(route = %nav.route(index), "navigate");
            }
            Err(CliError::Console(ConsoleError::InvalidState(format!(
                "save ended in {:?}",
                session.state()
            ))))
        }
    }
}

// --- streaming settings ---

async fn file_field(path: Option<&std::path::Path>, delete: bool) -> Result<FileField, CliError> {
    Ok(match (path, delete) {
        (Some(path), _) => FileField::from_path(path).await?,
        (None, true) => FileField::Delete,
        (None, false) => FileField::Keep,
    })
}

async fn streaming_settings(
    client: &ConsoleHttpClient,
    args: &StreamingArgs,
) -> Result<(), CliError> {
    let form = StreamingSettingsForm {
        enabled: args.enabled,
        join_parameters: args.join_parameters.clone(),
        default_pause_image: file_field(args.pause_image.as_deref(), args.delete_pause_image)
            .await?,
        css_file: file_field(args.css.as_deref(), args.delete_css).await?,
    };

    let settings = match client.update_streaming_settings(form.to_form()?).await {
        Ok(settings) => settings,
        Err(e) => {
            let failure = Failure::new(e, FailureSite::EntitySave, "/admin/streaming_settings");
            report(&failure, "/admin/streaming_settings");
            if let ConsoleError::Validation { errors, .. } = &failure.error {
                for (field, messages) in errors {
                    for message in messages {
                        eprintln!("{field}: {message}");
                    }
                }
            }
            return Err(failure.into());
        }
    };

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &settings)?;
    io::Write::write_all(&mut out, b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_args(sort_by: Option<&str>, desc: bool, page: u32) -> ListArgs {
        ListArgs {
            collection: Collection::Roles,
            room: None,
            page,
            sort_by: sort_by.map(str::to_string),
            desc,
            filter: Some("adm".into()),
            json: false,
        }
    }

    #[test]
    fn desc_flag_toggles_default_sort() {
        let q = query_from_args(Some("name"), &list_args(None, true, 3));
        assert_eq!(q.sort_by(), Some("name"));
        assert_eq!(q.sort_direction(), SortDirection::Desc);
        assert_eq!(q.filter(), Some("adm"));
        assert_eq!(q.page(), 3);
    }

    #[test]
    fn explicit_sort_column_starts_ascending() {
        let q = query_from_args(Some("name"), &list_args(Some("id"), false, 1));
        assert_eq!(q.sort_by(), Some("id"));
        assert_eq!(q.sort_direction(), SortDirection::Asc);

        let q = query_from_args(Some("name"), &list_args(Some("name"), false, 1));
        assert_eq!(q.sort_direction(), SortDirection::Asc);
    }

    #[test]
    fn assignments_patch_known_fields() {
        let mut draft = ServerPoolDraft {
            name: "Pool 1".into(),
            description: None,
            servers: vec![1],
            updated_at: Some("2024-01-01T08:00:00.000000Z".into()),
        };
        apply_assignments(
            &mut draft,
            &[
                ("name".into(), "Pool 2".into()),
                ("servers".into(), "[1,2]".into()),
                ("description".into(), "null".into()),
            ],
        )
        .unwrap();
        assert_eq!(draft.name, "Pool 2");
        assert_eq!(draft.servers, vec![1, 2]);
        assert_eq!(draft.description, None);

        let err = apply_assignments(&mut draft, &[("colour".into(), "red".into())]).unwrap_err();
        assert!(matches!(err, CliError::UnknownField(f) if f == "colour"));
    }
}
