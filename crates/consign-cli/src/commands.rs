use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use consign_codec::{encode, encode_list};
use consign_kv::JsonFileKvStore;
use consign_records::{Entity, RecordService, RecordsConfig};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    if let Command::Schemas(_) = cli.command {
        return cmd_schemas(&config, &cli.format);
    }

    let service = open_service(&cli, &config)?;
    match cli.command {
        Command::Init(args) => cmd_init(&service, args, &cli.format),
        Command::Create(args) => cmd_create(&service, args, &cli.format),
        Command::Update(args) => cmd_update(&service, args, &cli.format),
        Command::Get(args) => cmd_get(&service, args, &cli.format),
        Command::List(args) => cmd_list(&service, args, &cli.format),
        Command::Audit(_) => cmd_audit(&service, &cli.format),
        Command::Schemas(_) => cmd_schemas(&config, &cli.format),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<RecordsConfig> {
    match &cli.config {
        Some(path) => RecordsConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(RecordsConfig::default()),
    }
}

fn open_service(cli: &Cli, config: &RecordsConfig) -> anyhow::Result<RecordService> {
    let store = JsonFileKvStore::open(&cli.store)
        .with_context(|| format!("opening store {}", cli.store.display()))?;
    let service = config.service(cli.schema.as_deref(), Arc::new(store))?;
    Ok(service)
}

fn print_json(bytes: &[u8]) {
    println!("{}", String::from_utf8_lossy(bytes));
}

fn print_entity(entity: &Entity, identifier: &str) {
    let id = entity.get(identifier).unwrap_or("?");
    println!("{}", id.yellow().bold());
    for (name, value) in entity.iter().filter(|(name, _)| *name != identifier) {
        println!("  {}: {}", name.dimmed(), value);
    }
}

fn cmd_init(service: &RecordService, args: InitArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let seed = (!args.fields.is_empty()).then(|| Entity::from_pairs(args.fields));
    let created = service.init(seed.as_ref())?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "created": created })),
        OutputFormat::Text => {
            let schema = service.schema();
            if created {
                println!("{} Initialized {} index at {}", "✓".green().bold(), schema.name, schema.index_key.bold());
            } else {
                println!("{} index already present at {}", schema.name, schema.index_key.bold());
            }
            if let Some(entity) = &seed {
                let id = schema.identifier_of(entity).unwrap_or("?");
                println!("  Seeded: {}", id.yellow());
            }
        }
    }
    Ok(())
}

fn cmd_create(service: &RecordService, args: CreateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let entity = Entity::from_pairs(args.fields);
    service.create(&entity)?;
    match format {
        OutputFormat::Json => print_json(&encode(&entity)?),
        OutputFormat::Text => {
            let id = service.schema().identifier_of(&entity).unwrap_or("?");
            println!("{} Created {} {}", "✓".green().bold(), service.schema().name, id.yellow());
        }
    }
    Ok(())
}

fn cmd_update(service: &RecordService, args: UpdateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    service.update_field(&args.id, &args.field, &args.value)?;
    match format {
        OutputFormat::Json => print_json(&service.get_one_encoded(&args.id)?),
        OutputFormat::Text => println!(
            "{} Updated {} {}: {} = {}",
            "✓".green().bold(),
            service.schema().name,
            args.id.yellow(),
            args.field.bold(),
            args.value
        ),
    }
    Ok(())
}

fn cmd_get(service: &RecordService, args: GetArgs, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&service.get_one_encoded(&args.id)?),
        OutputFormat::Text => print_entity(&service.get_one(&args.id)?, &service.schema().identifier),
    }
    Ok(())
}

fn cmd_list(service: &RecordService, args: ListArgs, format: &OutputFormat) -> anyhow::Result<()> {
    if args.ids {
        let ids = service.ids()?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&ids)?),
            OutputFormat::Text => ids.iter().for_each(|id| println!("{id}")),
        }
        return Ok(());
    }

    let entities = service.get_all()?;
    match format {
        OutputFormat::Json => print_json(&encode_list(&entities)?),
        OutputFormat::Text => {
            if entities.is_empty() {
                println!("No {} records.", service.schema().name);
            }
            for entity in &entities {
                print_entity(entity, &service.schema().identifier);
            }
        }
    }
    Ok(())
}

fn cmd_audit(service: &RecordService, format: &OutputFormat) -> anyhow::Result<()> {
    let audit = service.audit()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&audit)?),
        OutputFormat::Text => {
            println!("Index {} ({} entries)", audit.index_key.bold(), audit.index_len);
            println!("  Present: {}", audit.present.len().to_string().green());
            for id in &audit.missing {
                println!("  {} {}", "missing:".red(), id);
            }
            for (id, reason) in &audit.corrupt {
                println!("  {} {} ({})", "corrupt:".red(), id, reason.dimmed());
            }
            for id in &audit.duplicates {
                println!("  {} {}", "duplicate:".yellow(), id);
            }
            if audit.is_consistent() {
                println!("{} Index consistent", "✓".green().bold());
            }
        }
    }
    if audit.is_consistent() {
        Ok(())
    } else {
        anyhow::bail!("index {} is inconsistent", audit.index_key)
    }
}

fn cmd_schemas(config: &RecordsConfig, format: &OutputFormat) -> anyhow::Result<()> {
    for schema in &config.schemas {
        let marker = if schema.name == config.default_schema { "*" } else { " " };
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(schema)?),
            OutputFormat::Text => {
                println!("{} {} (id: {}, index: {})", marker, schema.name.green().bold(), schema.identifier.yellow(), schema.index_key);
                for field in &schema.fields {
                    let tag = if field.required { "required" } else { "optional" };
                    println!("    {} {}", field.name, tag.dimmed());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use consign_kv::KvStore;

    fn run(store: &std::path::Path, args: &[&str]) -> anyhow::Result<()> {
        let store = store.to_str().unwrap();
        let mut argv = vec!["consign", "--store", store];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn create_update_and_list_through_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        run(&path, &["init"]).unwrap();
        run(
            &path,
            &["create", "packageID=P1", "packageType=box", "bookedOn=2016-01-01", "from=A", "to=B"],
        )
        .unwrap();
        run(&path, &["update", "P1", "flightNumber", "BA123"]).unwrap();
        run(&path, &["--format", "json", "list"]).unwrap();
        run(&path, &["audit"]).unwrap();

        let store = JsonFileKvStore::open(&path).unwrap();
        assert_eq!(store.get("Consignment").unwrap().unwrap(), br#"["P1"]"#);
        let p1 = consign_codec::decode(&store.get("P1").unwrap().unwrap()).unwrap();
        assert_eq!(p1.get("flightNumber"), Some("BA123"));
    }

    #[test]
    fn errors_surface_to_caller() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        assert!(run(&path, &["get", "P404"]).is_err());
        assert!(run(&path, &["create", "packageID=P1"]).is_err());
        assert!(run(&path, &["--schema", "nope", "list"]).is_err());
    }

    #[test]
    fn audit_fails_on_inconsistent_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        JsonFileKvStore::open(&path)
            .unwrap()
            .put("User", br#"["ghost"]"#)
            .unwrap();
        assert!(run(&path, &["--schema", "user", "audit"]).is_err());
        run(&path, &["--schema", "user", "list"]).unwrap();
    }

    #[test]
    fn schemas_does_not_touch_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        run(&path, &["schemas"]).unwrap();
        assert!(!path.exists());
    }
}
