use clap::{Args, Subcommand, ValueEnum};

#[derive(Args)]
pub struct KbArgs {
    #[command(subcommand)]
    pub command: KbCommand,
}

#[derive(Subcommand)]
pub enum KbCommand {
    #[command(about = "List knowledge bases")]
    List(KbListArgs),
    #[command(about = "Create a knowledge base")]
    Create(KbCreateArgs),
    #[command(about = "Show one knowledge base")]
    Get(KbIdArgs),
    #[command(about = "Rename a knowledge base or change its page rank")]
    Update(KbUpdateArgs),
    #[command(about = "Remove a knowledge base")]
    Delete(KbIdArgs),
    #[command(about = "Show document and chunk statistics of a knowledge base")]
    Info(KbIdArgs),
    #[command(about = "Show document metadata across knowledge bases")]
    Meta(KbMetaArgs),
    #[command(about = "Show the knowledge graph of a knowledge base")]
    Graph(KbIdArgs),
    #[command(about = "Remove the knowledge graph of a knowledge base")]
    RmGraph(KbIdArgs),
    #[command(about = "List tags of one or more knowledge bases")]
    Tags(KbTagsArgs),
    #[command(about = "Remove tags from a knowledge base")]
    RmTags(KbRmTagsArgs),
    #[command(about = "Rename a tag in a knowledge base")]
    RenameTag(KbRenameTagArgs),
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Args)]
pub struct KbListArgs {
    #[arg(long)]
    pub keywords: Option<String>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub page_size: Option<u32>,
    #[arg(long)]
    pub parser_id: Option<String>,
    #[arg(long, help = "Sort field (create_time, update_time)")]
    pub orderby: Option<String>,
    #[arg(long)]
    pub desc: Option<bool>,
    #[arg(long = "owner", help = "Only knowledge bases owned by these tenants")]
    pub owners: Vec<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct KbCreateArgs {
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub parser_id: Option<String>,
    #[arg(long)]
    pub embd_id: Option<String>,
}

#[derive(Args)]
pub struct KbIdArgs {
    pub kb_id: String,
}

#[derive(Args)]
pub struct KbUpdateArgs {
    pub kb_id: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub pagerank: Option<i64>,
}

#[derive(Args)]
pub struct KbTagsArgs {
    #[arg(required = true)]
    pub kb_ids: Vec<String>,
}

#[derive(Args)]
pub struct KbMetaArgs {
    #[arg(required = true)]
    pub kb_ids: Vec<String>,
}

#[derive(Args)]
pub struct KbRmTagsArgs {
    pub kb_id: String,
    #[arg(required = true)]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct KbRenameTagArgs {
    pub kb_id: String,
    pub from: String,
    pub to: String,
}
