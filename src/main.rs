use std::path::PathBuf;

use page_search::logging::{LogLevel, Logger};
use page_search::{ContentTree, DocumentTree, PageSearch, PageSearchError, Result, SearchConfig};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Some(options) => options,
        None => {
            print_usage();
            std::process::exit(2);
        }
    };

    let mut logger = Logger::new(if options.debug {
        LogLevel::Debug
    } else {
        LogLevel::Warning
    });
    if let Some(path) = &options.log_file {
        logger = logger.with_file_output(path);
    }
    logger.install()?;

    let config = match &options.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::load_default()?,
    };

    let content = std::fs::read_to_string(&options.input)?;
    let mut tree = load_document(&content)?;
    let root = tree.root();
    let original = tree.text_content(root);

    let mut search = PageSearch::new(config);
    search.open();
    search.search_now(&mut tree, root, &options.query);
    for _ in 0..options.advance {
        search.next(&mut tree);
    }

    if let Some(ui) = search.ui_state() {
        println!("{}", ui.message());
    }
    for handle in search.matches() {
        let marker = if handle.is_current(search.current_index()) {
            "*"
        } else {
            " "
        };
        println!("{} [{}] {:?}", marker, handle.index + 1, handle.text);
    }
    if options.show_markup {
        println!();
        println!("{}", tree.to_markup(root));
    }

    search.close(&mut tree);
    if tree.text_content(root) != original {
        return Err(PageSearchError::Io(
            "document text changed after closing search".to_string(),
        ));
    }
    Ok(())
}

struct CliOptions {
    input: PathBuf,
    query: String,
    advance: usize,
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
    debug: bool,
    show_markup: bool,
}

fn parse_args(args: &[String]) -> Option<CliOptions> {
    let mut positional: Vec<&String> = Vec::new();
    let mut advance = 0;
    let mut config = None;
    let mut log_file = None;
    let mut debug = false;
    let mut show_markup = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--next" => advance = iter.next()?.parse().ok()?,
            "--config" => config = Some(PathBuf::from(iter.next()?)),
            "--log" => log_file = Some(PathBuf::from(iter.next()?)),
            "--debug" => debug = true,
            "--markup" => show_markup = true,
            _ => positional.push(arg),
        }
    }

    if positional.len() != 2 {
        return None;
    }
    Some(CliOptions {
        input: PathBuf::from(positional[0]),
        query: positional[1].clone(),
        advance,
        config,
        log_file,
        debug,
        show_markup,
    })
}

/// 空行区切りの段落をそれぞれ `<p>` として読み込む
fn load_document(content: &str) -> Result<DocumentTree> {
    let mut tree = DocumentTree::new();
    let root = tree.root();
    for paragraph in content.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        let p = tree.append_element(root, "p")?;
        tree.append_text(p, paragraph)?;
    }
    Ok(tree)
}

fn print_usage() {
    eprintln!("page-search - find in page demo");
    eprintln!("Version: {}", env!("CARGO_PKG_VERSION"));
    eprintln!();
    eprintln!("usage: page-search <file> <query> [--next N] [--markup]");
    eprintln!("                   [--config <path>] [--log <path>] [--debug]");
}
