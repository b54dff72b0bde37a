mod invoice;
mod line_item;

pub use invoice::{
    CreateInvoiceRequest, CreateLineItemRequest, Invoice, InvoiceResponse, InvoiceStatus,
    LineItemResponse,
};
pub use line_item::LineItem;
