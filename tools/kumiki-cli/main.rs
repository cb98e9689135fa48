use clap::Parser;
use kumiki::definition::ToolboxKind;
use kumiki::prelude::*;
use std::fs;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

/// Drive a keyboard navigation session from the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a JSON array of block definitions
    blocks_path: Option<String>,
    /// Path to a toolbox definition JSON file
    toolbox_path: Option<String>,

    /// Path to a navigation config JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Path to a key map JSON file (serialised key -> action name)
    #[arg(short, long)]
    keys: Option<String>,

    /// Print the workspace tree after every action
    #[arg(short, long)]
    tree: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut navigator = build_navigator(&cli);
    run_session(&mut navigator, cli.tree);
}

fn build_navigator(cli: &Cli) -> Navigator {
    let config = match &cli.config {
        Some(path) => NavigationConfig::from_json(&read_file(path))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => NavigationConfig::default(),
    };

    // --- Workspace ---
    let demo = cli.blocks_path.is_none();
    let definitions = match &cli.blocks_path {
        Some(path) => BlockDefinition::list_from_json(&read_file(path))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load blocks: {}", e))),
        None => demo_definitions(),
    };
    let mut workspace = Workspace::builder().with_definitions(definitions).build();
    if demo {
        populate_demo(&mut workspace)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to build demo workspace: {}", e)));
    }

    // --- Toolbox or flyout ---
    let toolbox_definition = match &cli.toolbox_path {
        Some(path) => Some(
            ToolboxDefinition::from_json(&read_file(path))
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to load toolbox: {}", e))),
        ),
        None if demo => Some(demo_toolbox()),
        None => None,
    };
    let mut toolbox = None;
    let mut flyout = None;
    if let Some(definition) = toolbox_definition {
        definition
            .validate(&workspace)
            .unwrap_or_else(|e| exit_with_error(&format!("Invalid toolbox: {}", e)));
        match definition.kind {
            ToolboxKind::CategoryToolbox => {
                toolbox = Some(
                    Toolbox::from_definition(&definition)
                        .unwrap_or_else(|e| exit_with_error(&e.to_string())),
                );
            }
            ToolboxKind::FlyoutToolbox => {
                let blocks = definition
                    .flyout_blocks()
                    .unwrap_or_else(|e| exit_with_error(&e.to_string()));
                let mut palette = Flyout::for_workspace(&workspace, config.flyout_gap);
                palette
                    .show(&blocks)
                    .unwrap_or_else(|e| exit_with_error(&format!("Failed to fill flyout: {}", e)));
                flyout = Some(palette);
            }
        }
    }

    // --- Session ---
    let mut builder = Navigator::builder(workspace)
        .with_config(config)
        .with_logging_callback(Box::new(|level, message| {
            println!("  [{}] {}", level, message);
        }));
    if let Some(toolbox) = toolbox {
        builder = builder.with_toolbox(toolbox);
    }
    if let Some(flyout) = flyout {
        builder = builder.with_flyout(flyout);
    }
    if let Some(path) = &cli.keys {
        let keys = KeyMap::from_json(&read_file(path))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load key map: {}", e)));
        builder = builder.with_key_map(keys);
    }
    builder.build()
}

/// Reads action names (or `tree`, `quit`) from stdin and runs them.
fn run_session(navigator: &mut Navigator, tree: bool) {
    println!("--- Kumiki Navigation Session ---");
    println!(
        "Actions: {}",
        Action::ALL.iter().map(|a| a.name()).collect::<Vec<_>>().join(", ")
    );
    navigator.enable_keyboard_accessibility();
    print_state(navigator, tree);

    let stdin = io::stdin();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        match line.trim() {
            "" => continue,
            "quit" | "q" => break,
            "tree" => {
                print_tree(navigator);
                continue;
            }
            command => match command.parse::<Action>() {
                Ok(action) => {
                    if !navigator.on_action(action) {
                        println!("  ({} not handled)", action);
                    }
                    print_state(navigator, tree);
                }
                Err(e) => println!("  {}", e),
            },
        }
    }
}

fn print_state(navigator: &Navigator, tree: bool) {
    let location = match navigator.cursor().location() {
        Some(location) => DisplayLocation {
            location: &location,
            workspace: navigator.workspace(),
        }
        .to_string(),
        None => "nothing".to_string(),
    };
    println!("  [{}] cursor: {}", navigator.focus(), location);
    if let Some(marker) = navigator.marker().location() {
        println!(
            "  marker: {}",
            DisplayLocation {
                location: &marker,
                workspace: navigator.workspace(),
            }
        );
    }
    if navigator.focus() == FocusState::Flyout {
        if let (Some(flyout), Some(block)) = (navigator.flyout(), navigator.flyout_selection()) {
            let type_name = flyout
                .workspace()
                .block(block)
                .map_or("?", |b| b.type_name());
            println!("  flyout: {}", type_name);
        }
    }
    if tree {
        print_tree(navigator);
    }
}

fn print_tree(navigator: &Navigator) {
    let cursor = navigator
        .cursor()
        .location()
        .and_then(|l| l.source_block(navigator.workspace()));
    print!(
        "{}",
        DisplayWorkspace {
            workspace: navigator.workspace(),
            cursor,
        }
    );
}

// --- Demo content ---

fn demo_definitions() -> Vec<BlockDefinition> {
    vec![
        BlockDefinition::new("controls_if")
            .with_previous(None)
            .with_next(None)
            .with_input(
                InputDefinition::value("IF0")
                    .with_check(&["Boolean"])
                    .with_label("if"),
            )
            .with_input(
                InputDefinition::statement("DO0")
                    .with_label("do")
                    .with_offset(Coordinate::new(20.0, 30.0)),
            ),
        BlockDefinition::new("logic_boolean")
            .with_output(Some(&["Boolean"]))
            .with_input(InputDefinition::dummy("").with_field("BOOL", "TRUE")),
        BlockDefinition::new("math_number")
            .with_output(Some(&["Number"]))
            .with_input(InputDefinition::dummy("").with_field("NUM", "0")),
        BlockDefinition::new("text_print")
            .with_previous(None)
            .with_next(None)
            .with_input(InputDefinition::value("TEXT").with_label("print")),
    ]
}

fn demo_toolbox() -> ToolboxDefinition {
    ToolboxDefinition::from_json(
        r#"{
            "kind": "categoryToolbox",
            "contents": [
                { "kind": "category", "name": "Logic", "contents": [
                    { "kind": "block", "type": "controls_if" },
                    { "kind": "block", "type": "logic_boolean" }
                ] },
                { "kind": "category", "name": "Math", "contents": [
                    { "kind": "block", "type": "math_number" }
                ] },
                { "kind": "category", "name": "Text", "contents": [
                    { "kind": "block", "type": "text_print" }
                ] }
            ]
        }"#,
    )
    .unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn populate_demo(workspace: &mut Workspace) -> Result<()> {
    let branch = workspace.new_block_at("controls_if", Coordinate::new(20.0, 20.0))?;
    let condition = workspace.new_block("logic_boolean")?;
    let body = workspace.new_block("text_print")?;
    let input = |name: &str| {
        workspace
            .block(branch)
            .and_then(|b| b.input(name))
            .and_then(|i| i.connection())
    };
    let (Some(if0), Some(do0)) = (input("IF0"), input("DO0")) else {
        return Err("demo block is missing its inputs".into());
    };
    let output = workspace.block(condition).and_then(|b| b.output_connection());
    let previous = workspace.block(body).and_then(|b| b.previous_connection());
    if let (Some(output), Some(previous)) = (output, previous) {
        workspace.connect(if0, output)?;
        workspace.connect(do0, previous)?;
    }
    workspace.new_block_at("text_print", Coordinate::new(20.0, 200.0))?;
    Ok(())
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
