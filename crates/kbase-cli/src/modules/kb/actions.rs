use kbase_core::{
    CreateKnowledgeBaseRequest, ListKnowledgeBasesQuery, ListKnowledgeBasesRequest,
    UpdateKnowledgeBaseRequest,
};
use tracing::debug;

use super::args::{KbArgs, KbCommand, KbListArgs, OutputFormat};
use super::format_table::print_kb_table;
use crate::modules::system::{print_json, CommandContext, KNOWLEDGE_ROUTE};

pub(crate) async fn handle_kb(args: KbArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    ctx.enter(KNOWLEDGE_ROUTE);
    match args.command {
        KbCommand::List(args) => {
            let (query, filter) = list_request(&args);
            list_and_print(ctx, &query, &filter, args.format).await?;
        }
        KbCommand::Create(args) => {
            let payload = CreateKnowledgeBaseRequest {
                name: args.name,
                description: args.description,
                parser_id: args.parser_id,
                parser_config: None,
                embd_id: args.embd_id,
            };
            let created = ctx.client.create_kb(&payload).await?.into_data()?;
            match created.id() {
                Some(id) => println!("Created knowledge base {id}"),
                None => println!("Created knowledge base {}", payload.name),
            }
            refetch(ctx).await?;
        }
        KbCommand::Get(args) => {
            let kb = ctx.client.get_kb(&args.kb_id).await?.into_data()?;
            print_json(&kb)?;
        }
        KbCommand::Update(args) => {
            let payload = UpdateKnowledgeBaseRequest {
                kb_id: args.kb_id,
                name: args.name,
                pagerank: args.pagerank,
            };
            ctx.client.update_kb(&payload).await?.into_result()?;
            println!("Updated knowledge base {}", payload.kb_id);
            refetch(ctx).await?;
        }
        KbCommand::Delete(args) => {
            ctx.client.delete_kb(&args.kb_id).await?.into_result()?;
            println!("Deleted knowledge base {}", args.kb_id);
            refetch(ctx).await?;
        }
        KbCommand::Info(args) => {
            let info = ctx.client.basic_info(&args.kb_id).await?.into_data()?;
            print_json(&info)?;
        }
        KbCommand::Meta(args) => {
            let meta = ctx.client.get_meta(&args.kb_ids).await?.into_data()?;
            print_json(&meta)?;
        }
        KbCommand::Graph(args) => {
            let graph = ctx.client.knowledge_graph(&args.kb_id).await?.into_data()?;
            debug!(nodes = graph.node_count(), "knowledge graph loaded");
            print_json(&graph)?;
        }
        KbCommand::RmGraph(args) => {
            ctx.client
                .delete_knowledge_graph(&args.kb_id)
                .await?
                .into_result()?;
            println!("Deleted knowledge graph of {}", args.kb_id);
        }
        KbCommand::Tags(args) => {
            let response = match args.kb_ids.as_slice() {
                [kb_id] => ctx.client.list_tags(kb_id).await?,
                kb_ids => ctx.client.list_tags_for_kbs(kb_ids).await?,
            };
            print_json(&response.into_data()?)?;
        }
        KbCommand::RmTags(args) => {
            ctx.client
                .remove_tags(&args.kb_id, args.tags)
                .await?
                .into_result()?;
            println!("Removed tags from {}", args.kb_id);
        }
        KbCommand::RenameTag(args) => {
            ctx.client
                .rename_tag(&args.kb_id, &args.from, &args.to)
                .await?
                .into_result()?;
            println!("Renamed tag {} to {}", args.from, args.to);
        }
    }
    Ok(())
}

fn list_request(args: &KbListArgs) -> (ListKnowledgeBasesQuery, ListKnowledgeBasesRequest) {
    let query = ListKnowledgeBasesQuery {
        keywords: args.keywords.clone(),
        page: args.page,
        page_size: args.page_size,
        parser_id: args.parser_id.clone(),
        orderby: args.orderby.clone(),
        desc: args.desc,
    };
    let filter = ListKnowledgeBasesRequest {
        owner_ids: (!args.owners.is_empty()).then(|| args.owners.clone()),
    };
    (query, filter)
}

async fn list_and_print(
    ctx: &CommandContext,
    query: &ListKnowledgeBasesQuery,
    filter: &ListKnowledgeBasesRequest,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let list = ctx.client.list_kbs(query, filter).await?.into_data()?;
    match format {
        OutputFormat::Json => print_json(&list)?,
        OutputFormat::Table => print_kb_table(&list.kbs, list.total),
    }
    Ok(())
}

/// The server owns the records; show its view after every change.
async fn refetch(ctx: &CommandContext) -> anyhow::Result<()> {
    debug!("refetching knowledge base list");
    list_and_print(
        ctx,
        &ListKnowledgeBasesQuery::default(),
        &ListKnowledgeBasesRequest::default(),
        OutputFormat::Json,
    )
    .await
}
