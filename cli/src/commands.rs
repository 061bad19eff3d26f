use std::cell::RefCell;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use page_hooks::InMemoryFile;
use page_hooks::Notice;
use page_hooks::Notifier;
use page_hooks::PageBindings;
use page_hooks::ReqwestTransport;
use page_hooks::UploadClient;
use page_hooks::UploadOutcome;
use page_hooks::file::mime_type_for_name;
use page_hooks::link::LinkOpener;
use page_hooks_protocol::PageBindingsConfig;
use page_hooks_protocol::endpoints;
use url::Url;

use crate::config::load_page_config;
use crate::output::write_output;
use crate::render;

/// Stands in for the page when describing bindings; only `check` uses it.
const CHECK_PAGE_URL: &str = "http://localhost/";

/// Prints each notice once, the way the browser shows one toast.
struct TerminalNotifier<W> {
    out: RefCell<W>,
}

impl TerminalNotifier<io::Stderr> {
    fn stderr() -> Self {
        Self {
            out: RefCell::new(io::stderr()),
        }
    }
}

impl<W: Write> Notifier for TerminalNotifier<W> {
    fn notify(&self, notice: Notice) {
        let _ = writeln!(self.out.borrow_mut(), "{notice}");
    }
}

fn config_or_default(path: Option<&Path>) -> anyhow::Result<PageBindingsConfig> {
    match path {
        Some(path) => load_page_config(path),
        None => Ok(PageBindingsConfig::default()),
    }
}

pub fn render(config: &Path, output: Option<&Path>, json_only: bool) -> anyhow::Result<()> {
    let config = load_page_config(config)?;
    let snippet = if json_only {
        render::config_json(&config)?
    } else {
        render::script_element(&config)?
    };

    match output {
        Some(path) => {
            write_output(path, &snippet)?;
            tracing::info!("wrote {}", path.display());
        }
        None => print!("{snippet}"),
    }
    Ok(())
}

pub fn check(config: &Path) -> anyhow::Result<()> {
    let config = load_page_config(config)?;
    for line in describe(&config)? {
        println!("{line}");
    }
    Ok(())
}

/// One line per binding the page would register, keyboard routes in dispatch order.
fn describe(config: &PageBindingsConfig) -> anyhow::Result<Vec<String>> {
    let page_url = Url::parse(CHECK_PAGE_URL)?;
    let bindings = PageBindings::new(config.clone(), page_url)?;

    let mut lines: Vec<String> = bindings
        .dispatcher()
        .route_names()
        .into_iter()
        .map(|route| format!("keydown: {route}"))
        .collect();

    let upload = &config.upload;
    let limit = upload.max_file_size_label();
    if let Some(id) = &config.paste_target_id {
        lines.push(format!("paste: #{id} -> POST {} (max {limit} per file)", upload.endpoint));
    }
    if let Some(id) = &config.drop_container_id {
        lines.push(format!("drop: #{id} -> POST {} (max {limit} per file)", upload.endpoint));
    }
    if bindings.link_interceptor().is_some() {
        lines.push(format!("links: GET {}?url=<destination>", config.links.endpoint));
    }
    if lines.is_empty() {
        lines.push("no bindings configured".to_string());
    }
    Ok(lines)
}

fn read_upload_file(path: &Path) -> anyhow::Result<InMemoryFile> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let mime_type = mime_type_for_name(&name);
    Ok(InMemoryFile::new(name, mime_type, bytes))
}

async fn run_upload(
    page_url: Url,
    config: Option<&Path>,
    files: &[PathBuf],
    notifier: impl Notifier,
) -> anyhow::Result<UploadOutcome> {
    let config = config_or_default(config)?;
    let files = files
        .iter()
        .map(PathBuf::as_path)
        .map(read_upload_file)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let client = UploadClient::new(config.upload, page_url, ReqwestTransport::new()?, notifier);
    Ok(client
        .upload(files, || tracing::debug!("upload accepted"))
        .await)
}

pub async fn upload(page_url: Url, config: Option<&Path>, files: &[PathBuf]) -> anyhow::Result<()> {
    match run_upload(page_url, config, files, TerminalNotifier::stderr()).await? {
        UploadOutcome::Succeeded { files } => {
            println!("uploaded {files} file(s)");
            Ok(())
        }
        UploadOutcome::Skipped => Ok(()),
        // The notifier already reported the failure.
        UploadOutcome::Failed(_) => std::process::exit(1),
    }
}

async fn request_open_link(
    base_url: &Url,
    config: Option<&Path>,
    destination: &str,
) -> anyhow::Result<Url> {
    let config = config_or_default(config)?;
    let request = endpoints::open_external_link_url(base_url, &config.links.endpoint, destination)
        .with_context(|| format!("build open-external-link request for {destination}"))?;
    ReqwestTransport::new()?
        .open(request.clone())
        .await
        .with_context(|| format!("GET {request}"))?;
    Ok(request)
}

pub async fn open_link(
    base_url: &Url,
    config: Option<&Path>,
    destination: &str,
) -> anyhow::Result<()> {
    let request = request_open_link(base_url, config, destination).await?;
    tracing::info!("requested {request}");
    Ok(())
}
