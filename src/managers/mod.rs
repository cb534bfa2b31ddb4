// mdshare persistence managers
// Managers own the server-side collections: documents, shared groups, visitors, comments, reactions.

pub mod comment_manager;
pub mod group_manager;
pub mod markdown_manager;
pub mod reaction_manager;
pub mod visitor_manager;
