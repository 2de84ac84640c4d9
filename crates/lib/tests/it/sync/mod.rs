mod document_sync;
mod order_sync;
