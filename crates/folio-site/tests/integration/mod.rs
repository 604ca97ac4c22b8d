mod comment_stream;
mod portfolio_sync;
mod project_detail;
