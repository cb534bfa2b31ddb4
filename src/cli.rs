//! mdshare command-line client.
//!
//! Talks to an mdshare server and keeps saved links, local groups, drafts
//! and the visitor identity in a local store directory.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};

use mdshare::client::ApiClient;
use mdshare::platform;
use mdshare::store::drafts::open_draft;
use mdshare::store::{FileStore, KeyValueStore, ReactionTracker, SavedLinks, VisitorIdentity};
use mdshare::types::markdown::Markdown;
use mdshare::types::reaction::ReactionType;
use mdshare::types::saved_link::SavedLink;
use mdshare::types::visitor::Visitor;

#[derive(Debug, Parser)]
#[command(name = "mdshare", version, about = "Share markdown documents from the command line")]
struct Cli {
    /// Server base URL.
    #[arg(long, env = "MDSHARE_URL", default_value = "http://localhost:3000", global = true)]
    server: String,

    /// Directory for saved links, drafts and the visitor identity.
    #[arg(long, env = "MDSHARE_STORE_DIR", global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload a file, inline text or standard input.
    Upload {
        /// Markdown file to upload. Reads standard input when neither a file nor --text is given.
        file: Option<PathBuf>,
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Also save the new document to the local links.
        #[arg(long)]
        save: bool,
    },
    /// Show a document.
    View {
        id: String,
        /// Print only the raw markdown.
        #[arg(long)]
        raw: bool,
    },
    /// Replace a document's content.
    Edit {
        id: String,
        #[command(flatten)]
        source: ContentSource,
        #[arg(long)]
        title: Option<String>,
    },
    /// Suggest a title for a document.
    Title { id: String },
    /// Comment on a document.
    Comment { id: String, content: String },
    /// List comments on a document, newest first.
    Comments { id: String },
    /// Toggle your like on a document.
    Like { id: String },
    /// Show the like count of a document.
    Reactions { id: String },
    /// Save a document to the local links.
    Save {
        id: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Remove a document from the local links and every local group.
    Unsave { id: String },
    /// List saved links and local groups.
    Links,
    /// Manage local groups.
    #[command(subcommand)]
    Group(GroupCommand),
    /// Show the visitor identity, creating one if needed.
    Whoami,
    /// Set the visitor display name.
    Name { name: String },
    /// Manage editor drafts.
    #[command(subcommand)]
    Draft(DraftCommand),
}

#[derive(Debug, Args)]
struct ContentSource {
    /// Read the content from a file.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Use inline content.
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,
}

#[derive(Debug, Subcommand)]
enum GroupCommand {
    /// Create a local group.
    Create { title: String, ids: Vec<String> },
    /// Delete a local group. Its links stay saved.
    Delete { group_id: String },
    /// Add links to a local group.
    Add {
        group_id: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Remove one link from a local group.
    Remove { group_id: String, id: String },
    /// Show a local group.
    Show { group_id: String },
    /// Publish a local group as a shareable server group.
    Share { group_id: String },
}

#[derive(Debug, Subcommand)]
enum DraftCommand {
    /// Store draft text under a key.
    Save {
        key: String,
        #[command(flatten)]
        source: ContentSource,
    },
    /// Print a draft.
    Show { key: String },
    /// Delete a draft.
    Clear { key: String },
}

impl ContentSource {
    fn read(&self) -> anyhow::Result<String> {
        match (&self.file, &self.text) {
            (Some(path), _) => {
                std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
            }
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => read_stdin(),
        }
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read standard input")?;
    Ok(buf)
}

struct Session {
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    fn links(&self) -> SavedLinks {
        SavedLinks::open(self.store.clone())
    }

    fn identity(&self) -> VisitorIdentity<ApiClient> {
        VisitorIdentity::new(self.store.clone(), self.client.clone())
    }

    async fn visitor(&self) -> anyhow::Result<Visitor> {
        self.identity()
            .identify()
            .await
            .context("failed to resolve visitor identity")
    }
}

fn print_markdown(doc: &Markdown, url: &str) {
    println!("{}", doc.display_title());
    println!("{}", url);
    println!();
    println!("{}", doc.content);
}

fn print_link(link: &SavedLink) {
    println!("  {}  {}", link.id, link.title.as_deref().unwrap_or(""));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mdshare::logging::init("mdshare", "warn");
    let cli = Cli::parse();

    let store_dir = cli.store_dir.unwrap_or_else(platform::get_store_dir);
    let ctx = Session {
        client: ApiClient::new(&cli.server)?,
        store: Arc::new(FileStore::new(store_dir)),
    };

    match cli.command {
        Command::Upload { file, text, title, save } => {
            let id = match (file, text) {
                (Some(path), _) => ctx.client.upload_file(&path, title.as_deref()).await?,
                (None, Some(text)) => ctx.client.upload_text(&text, title.as_deref()).await?,
                (None, None) => {
                    let text = read_stdin()?;
                    if text.is_empty() {
                        bail!("nothing to upload on standard input");
                    }
                    ctx.client.upload_text(&text, title.as_deref()).await?
                }
            };
            if save {
                let doc = ctx.client.get_markdown(&id).await?;
                ctx.links().save_link(&id, doc.title.as_deref());
            }
            println!("{}", id);
            println!("{}", ctx.client.view_url(&id));
        }
        Command::View { id, raw } => {
            if raw {
                print!("{}", ctx.client.download(&id).await?);
            } else {
                let doc = ctx.client.get_markdown(&id).await?;
                print_markdown(&doc, &ctx.client.view_url(&id));
            }
        }
        Command::Edit { id, source, title } => {
            let content = source.read()?;
            let doc = ctx.client.update_markdown(&id, &content, title.as_deref()).await?;
            println!("Updated {} ({})", doc.id, doc.display_title());
        }
        Command::Title { id } => match ctx.client.generate_title(&id, None).await? {
            Some(title) => println!("{}", title),
            None => println!("No title could be generated."),
        },
        Command::Comment { id, content } => {
            let visitor = ctx.visitor().await?;
            let comment = ctx.client.add_comment(&id, &visitor.id, &content).await?;
            println!("Comment {} added", comment.id);
        }
        Command::Comments { id } => {
            let comments = ctx.client.list_comments(&id).await?;
            if comments.is_empty() {
                println!("No comments yet.");
            }
            for comment in comments {
                let author = comment.visitor.name.as_deref().unwrap_or("Anonymous");
                println!("{} ({}):", author, comment.created_at);
                println!("  {}", comment.content);
            }
        }
        Command::Like { id } => {
            let visitor = ctx.visitor().await?;
            let tracker = ReactionTracker::new(id, ReactionType::Like, ctx.client.clone());
            tracker.refresh(Some(&visitor.id)).await?;
            let snapshot = tracker.toggle(Some(&visitor.id)).await?;
            let verb = if snapshot.user_reacted { "Liked" } else { "Unliked" };
            println!("{} ({} like(s))", verb, snapshot.count);
        }
        Command::Reactions { id } => {
            let identity = ctx.identity();
            identity.hydrate();
            let cached = identity.cached_id();
            let tracker = ReactionTracker::new(id, ReactionType::Like, ctx.client.clone());
            let snapshot = tracker.refresh(cached.as_deref()).await?;
            let mine = if snapshot.user_reacted { " (including yours)" } else { "" };
            println!("{} like(s){}", snapshot.count, mine);
        }
        Command::Save { id, title } => {
            let links = ctx.links();
            if links.save_link(&id, title.as_deref()) {
                println!("Saved {}", id);
            } else {
                println!("{} is already saved", id);
            }
        }
        Command::Unsave { id } => {
            ctx.links().remove_link(&id);
            println!("Removed {}", id);
        }
        Command::Links => {
            let links = ctx.links();
            let saved = links.links();
            println!("Saved links ({}):", saved.len());
            for link in &saved {
                print_link(link);
            }
            for group in links.groups() {
                println!("Group {}: {} ({} link(s))", group.id, group.title, group.link_ids.len());
            }
        }
        Command::Group(cmd) => run_group(&ctx, cmd).await?,
        Command::Whoami => {
            let visitor = ctx.visitor().await?;
            println!("{}  {}", visitor.id, visitor.name.as_deref().unwrap_or("(no name)"));
        }
        Command::Name { name } => {
            let identity = ctx.identity();
            identity.identify().await?;
            let visitor = identity
                .update_name(&name)
                .await?
                .ok_or_else(|| anyhow!("no visitor identity resolved"))?;
            println!("Name set to {}", visitor.name.as_deref().unwrap_or(""));
        }
        Command::Draft(cmd) => run_draft(&ctx, cmd)?,
    }
    Ok(())
}

async fn run_group(ctx: &Session, cmd: GroupCommand) -> anyhow::Result<()> {
    let links = ctx.links();
    match cmd {
        GroupCommand::Create { title, ids } => {
            let group = links.create_group(&title, ids);
            println!("{}", group.id);
        }
        GroupCommand::Delete { group_id } => {
            links.delete_group(&group_id);
            println!("Deleted {}", group_id);
        }
        GroupCommand::Add { group_id, ids } => {
            if links.group(&group_id).is_none() {
                bail!("no local group {}", group_id);
            }
            links.add_to_group(&group_id, &ids);
        }
        GroupCommand::Remove { group_id, id } => {
            links.remove_from_group(&group_id, &id);
        }
        GroupCommand::Show { group_id } => {
            let group = links
                .group(&group_id)
                .ok_or_else(|| anyhow!("no local group {}", group_id))?;
            println!("{} ({})", group.title, group.id);
            for link in links.group_links(&group_id) {
                print_link(&link);
            }
        }
        GroupCommand::Share { group_id } => {
            let group = links
                .group(&group_id)
                .ok_or_else(|| anyhow!("no local group {}", group_id))?;
            let ids: Vec<String> = links.group_links(&group_id).into_iter().map(|l| l.id).collect();
            let shared = ctx.client.create_group(&group.title, &ids).await?;
            println!("{}", ctx.client.group_url(&shared.id));
        }
    }
    Ok(())
}

fn run_draft(ctx: &Session, cmd: DraftCommand) -> anyhow::Result<()> {
    match cmd {
        DraftCommand::Save { key, source } => {
            let content = source.read()?;
            open_draft(ctx.store.clone(), &key).set(content);
        }
        DraftCommand::Show { key } => print!("{}", open_draft(ctx.store.clone(), &key).get()),
        DraftCommand::Clear { key } => open_draft(ctx.store.clone(), &key).reset(),
    }
    Ok(())
}
