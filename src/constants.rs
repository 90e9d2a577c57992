// Auth
pub const MESSAGE_INVALID_TOKEN: &str = "Invalid or missing token";
pub const ONE_WEEK: usize = 60 * 60 * 24 * 7;

// Server defaults
pub const DEFAULT_SOCKET_URL: &str = "0.0.0.0:8080";
pub const TRANSACTIONS_SCOPE: &str = "/api/transactions";

// Validation limits
pub const MAX_CATEGORY_LENGTH: u64 = 100;
pub const MAX_DESCRIPTION_LENGTH: u64 = 500;

// Response messages
pub const MESSAGE_CREATED: &str = "Transaction created successfully";
pub const MESSAGE_UPDATED: &str = "Transaction updated successfully";
pub const MESSAGE_DELETED: &str = "Transaction deleted successfully";
pub const MESSAGE_NOT_FOUND: &str = "Transaction not found";
pub const MESSAGE_REQUIRED_FIELDS: &str = "Type, amount, and category are required";
pub const MESSAGE_INVALID_TYPE: &str = "Type must be income, expense, or saving";
pub const MESSAGE_INVALID_AMOUNT: &str = "Amount must be greater than 0";

// Internal failure messages
pub const ERR_CREATE: &str = "Failed to create transaction";
pub const ERR_LIST: &str = "Failed to retrieve transactions";
pub const ERR_UPDATE: &str = "Failed to update transaction";
pub const ERR_DELETE: &str = "Failed to delete transaction";
