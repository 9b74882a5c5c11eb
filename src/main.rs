use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kira_splice::ase::GroupLabels;
use kira_splice::cli::{Cli, Commands, NovelArg, SelectionArgs};
use kira_splice::ctx::{Ctx, IntegrationScope, NovelMode};
use kira_splice::event::{EventType, Tool};
use kira_splice::integrate::resolve_tools;
use kira_splice::io;
use kira_splice::pipeline::Pipeline;
use kira_splice::pipeline::stage0_scaffold::Stage0Scaffold;
use kira_splice::pipeline::stage1_resolve::Stage1Resolve;
use kira_splice::pipeline::stage2_annotation::Stage2Annotation;
use kira_splice::pipeline::stage3_collect::Stage3Collect;
use kira_splice::pipeline::stage3_units::Stage3Units;
use kira_splice::pipeline::stage4_integrate::Stage4Integrate;
use kira_splice::pipeline::stage5_output::Stage5Output;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Unify(args) => {
            let (tools, events) = resolve_selection(&args.selection)?;
            let mut ctx = Ctx::new(
                args.input,
                args.output,
                args.sample_name,
                tools,
                events,
                env!("CARGO_PKG_VERSION"),
            );
            ctx.gtf = args.gtf;
            ctx.novel = match args.novel {
                NovelArg::Exclude => NovelMode::Exclude,
                NovelArg::Include => NovelMode::Include,
            };
            ctx.labels = GroupLabels::new(args.test_label, args.control_label);
            ctx.threads = args.threads;
            ctx.fail_fast = args.fail_fast;
            ctx.write_json = args.json;

            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage1Resolve::new()),
                Box::new(Stage2Annotation::new()),
                Box::new(Stage3Units::new()),
                Box::new(Stage4Integrate::new()),
                Box::new(Stage5Output::new()),
            ]);
            pipeline.run(&mut ctx)?;
            print_summary(&ctx);
        }
        Commands::Integrate(args) => {
            let (tools, events) = resolve_selection(&args.selection)?;
            let mut ctx = Ctx::new(
                args.input,
                args.output,
                args.sample_name,
                tools,
                events,
                env!("CARGO_PKG_VERSION"),
            );
            ctx.scope = IntegrationScope::Pooled;
            ctx.write_json = args.json;

            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage1Resolve::new()),
                Box::new(Stage3Collect::new()),
                Box::new(Stage4Integrate::new()),
                Box::new(Stage5Output::new()),
            ]);
            pipeline.run(&mut ctx)?;
            print_summary(&ctx);
        }
        Commands::Validate(args) => {
            let (tools, events) = resolve_selection(&args.selection)?;
            print_validate_summary(&tools, &events);
        }
    }

    Ok(())
}

fn resolve_selection(selection: &SelectionArgs) -> Result<(Vec<Tool>, Vec<EventType>)> {
    let tools = resolve_tools(&selection.software)?;
    let events = if selection.event.is_empty() {
        EventType::ALL.to_vec()
    } else {
        let mut events = Vec::with_capacity(selection.event.len());
        for name in &selection.event {
            let event: EventType = name.parse()?;
            if !events.contains(&event) {
                events.push(event);
            }
        }
        events
    };
    Ok((tools, events))
}

fn print_summary(ctx: &Ctx) {
    print!("{}", io::summary::format_summary(ctx));
    print_warnings(&ctx.warnings);
}

fn print_validate_summary(tools: &[Tool], events: &[EventType]) {
    println!("kira-splice validate ok");
    let mut warnings = Vec::new();
    for &event in events {
        for &tool in tools {
            if tool.supports(event) {
                println!("{}\t{}\tsupported", tool, event);
            } else {
                println!("{}\t{}\tunsupported", tool, event);
                warnings.push(format!("{} does not report {} events", tool, event));
            }
        }
    }
    print_warnings(&warnings);
}

fn print_warnings(warnings: &[String]) {
    if !warnings.is_empty() {
        println!("warnings:");
        for warning in warnings {
            println!("- {}", warning);
        }
    }
}
