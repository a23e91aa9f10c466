use clap::{Arg, ArgMatches, Command};
use log::error;
use pipeline_admin::listview::{highlight, FieldKey, PageSize, Record, SortState};
use pipeline_admin::prelude::*;
use std::process;

const RESOURCES: [&str; 5] = [
    "scenarios",
    "processed-scenarios",
    "triplets",
    "models",
    "datasets",
];

fn cli() -> Command<'static> {
    let resource = Arg::new("resource")
        .help("Collection to operate on")
        .required(true)
        .possible_values(RESOURCES);

    Command::new("pipeline-admin")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command-line access to the ML pipeline admin API")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("Fetch a collection and print one page of it")
                .arg(resource.clone())
                .arg(
                    Arg::new("search")
                        .short('s')
                        .long("search")
                        .takes_value(true)
                        .help("Case-insensitive search term"),
                )
                .arg(
                    Arg::new("facet")
                        .long("facet")
                        .takes_value(true)
                        .help("Secondary filter term (method filter on scenarios)"),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .takes_value(true)
                        .value_name("FIELD:DIR")
                        .help("Sort key, e.g. created_at:desc"),
                )
                .arg(
                    Arg::new("page")
                        .short('p')
                        .long("page")
                        .takes_value(true)
                        .default_value("1"),
                )
                .arg(
                    Arg::new("page-size")
                        .long("page-size")
                        .takes_value(true)
                        .possible_values(["25", "50", "100", "200"]),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete items by id")
                .arg(resource)
                .arg(
                    Arg::new("ids")
                        .required(true)
                        .multiple_values(true)
                        .help("Ids to delete"),
                ),
        )
        .subcommand(
            Command::new("train")
                .about("Start a training run")
                .arg(
                    Arg::new("dataset")
                        .short('d')
                        .long("dataset")
                        .takes_value(true)
                        .required(true),
                )
                .arg(Arg::new("name").long("name").takes_value(true))
                .arg(Arg::new("description").long("description").takes_value(true))
                .arg(Arg::new("epochs").long("epochs").takes_value(true).default_value("10"))
                .arg(
                    Arg::new("batch-size")
                        .long("batch-size")
                        .takes_value(true)
                        .default_value("32"),
                )
                .arg(
                    Arg::new("learning-rate")
                        .long("learning-rate")
                        .takes_value(true)
                        .default_value("0.001"),
                ),
        )
        .subcommand(Command::new("health").about("Check that the backend is up"))
}

// Matches of the search term are wrapped in `*`.
fn render<T: Record>(item: &T, term: &str) -> String {
    let fields: Vec<String> = <T::Field as FieldKey>::all()
        .iter()
        .map(|field| {
            let value = item.field(*field).values().join(",");
            let marked: String = highlight(&value, term)
                .iter()
                .map(|segment| {
                    if segment.matched {
                        format!("*{}*", segment.text)
                    } else {
                        segment.text.to_string()
                    }
                })
                .collect();
            format!("{}={}", field.name(), marked)
        })
        .collect();
    fields.join("  ")
}

async fn list<T: Resource>(admin: &PipelineAdmin, args: &ArgMatches) -> Result<()> {
    let mut session = admin.list_session::<T>();
    if !session.refresh().await {
        return Err(Error::general(session.error().unwrap_or("fetch failed")));
    }

    let engine = session.engine_mut();
    if let Some(size) = args.value_of("page-size") {
        let size: usize = size.parse().map_err(Error::general)?;
        engine.set_page_size(PageSize::try_from(size)?);
    }
    if let Some(spec) = args.value_of("search") {
        engine.set_search_term(spec);
    }
    if let Some(spec) = args.value_of("facet") {
        engine.set_facet_term(spec);
    }
    if let Some(spec) = args.value_of("sort") {
        let sort = SortState::<T::Field>::parse(spec)?;
        if !engine.set_sort(sort.field, sort.direction) {
            return Err(Error::validation(format!(
                "{} is not sortable",
                sort.field.name()
            )));
        }
    }
    let page: usize = args
        .value_of("page")
        .unwrap_or("1")
        .parse()
        .map_err(Error::general)?;
    engine.set_page(page);

    let term = engine.filter().term.clone();
    for item in engine.page_items() {
        println!("{}", render(item, &term));
    }
    println!("{}", engine.page_info());
    Ok(())
}

async fn delete<T: Resource>(admin: &PipelineAdmin, args: &ArgMatches) -> Result<()> {
    let ids: Vec<String> = args
        .values_of("ids")
        .map(|values| values.map(str::to_string).collect())
        .unwrap_or_default();

    let outcome = admin.resource::<T>().delete_items(&ids).await;
    for (id, err) in &outcome.failed {
        eprintln!("{}: {}", id, err);
    }
    println!("{}", outcome.summary());
    if outcome.is_success() {
        Ok(())
    } else {
        Err(Error::general(outcome.summary()))
    }
}

async fn train(admin: &PipelineAdmin, args: &ArgMatches) -> Result<()> {
    let mut config = TrainingConfig::new(args.value_of("dataset").unwrap_or_default())
        .with_numeric_fields(
            args.value_of("epochs").unwrap_or("10"),
            args.value_of("batch-size").unwrap_or("32"),
            args.value_of("learning-rate").unwrap_or("0.001"),
        )?;
    if let Some(name) = args.value_of("name") {
        config = config.with_name(name);
    }
    if let Some(description) = args.value_of("description") {
        config = config.with_description(description);
    }

    let model = admin.actions().train_model(&config).await?;
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

async fn run(admin: &PipelineAdmin, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", args)) => match args.value_of("resource").unwrap_or_default() {
            "scenarios" => list::<Scenario>(admin, args).await,
            "processed-scenarios" => list::<ProcessedScenario>(admin, args).await,
            "triplets" => list::<Triplet>(admin, args).await,
            "models" => list::<TrainedModel>(admin, args).await,
            "datasets" => list::<Dataset>(admin, args).await,
            other => Err(Error::validation(format!("unknown resource {}", other))),
        },
        Some(("delete", args)) => match args.value_of("resource").unwrap_or_default() {
            "scenarios" => delete::<Scenario>(admin, args).await,
            "processed-scenarios" => delete::<ProcessedScenario>(admin, args).await,
            "triplets" => delete::<Triplet>(admin, args).await,
            "models" => delete::<TrainedModel>(admin, args).await,
            "datasets" => delete::<Dataset>(admin, args).await,
            other => Err(Error::validation(format!("unknown resource {}", other))),
        },
        Some(("train", args)) => train(admin, args).await,
        Some(("health", _)) => {
            let health = admin.actions().health().await?;
            println!("{}", health.status);
            if health.is_ok() {
                Ok(())
            } else {
                Err(Error::general(format!("backend reports {}", health.status)))
            }
        }
        _ => Err(Error::general("no command given")),
    }
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let matches = cli().get_matches();
    let admin = match PipelineAdmin::from_env() {
        Ok(admin) => admin,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err);
            process::exit(2);
        }
    };

    if let Err(err) = run(&admin, &matches).await {
        error!("{}", err);
        eprintln!("{}", err);
        process::exit(1);
    }
}
