/// Default JWT lifetime in hours (3 days)
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 72;

/// Default bcrypt work factor for stored passwords
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Default joke source, queried when a post is created without content
pub const DEFAULT_JOKE_API_URL: &str = "https://api.api-ninjas.com/v1/jokes";

/// Default invoice gateway endpoint
pub const DEFAULT_INVOICE_API_URL: &str = "https://api.xendit.co/v2/invoices";

/// Invoice validity window in seconds (24 hours)
pub const INVOICE_DURATION_SECS: i64 = 86_400;

/// Currency used for every price, deposit and invoice
pub const CURRENCY: &str = "IDR";

/// Accepted shape of a post image URL
pub const IMAGE_URL_PATTERN: &str = r"^(http|https)://[^\s/$.?#].[^\s]*$";

// =============================================================================
// Error Messages
// =============================================================================

/// Request body could not be parsed
pub const ERR_INVALID_INPUT: &str = "Invalid input";

/// Authorization header missing or not a bearer token
pub const ERR_MISSING_JWT: &str = "missing or malformed jwt";

/// Token signature or expiry check failed
pub const ERR_INVALID_JWT: &str = "invalid or expired jwt";

/// Login with an unknown email
pub const ERR_EMAIL_NOT_FOUND: &str = "Email not found";

/// Login with the wrong password
pub const ERR_INCORRECT_PASSWORD: &str = "Incorrect password";

/// Registration collided with an existing email or username
pub const ERR_USER_EXISTS: &str = "Email or username already registered";

pub const ERR_USER_NOT_FOUND: &str = "User not found";
pub const ERR_BOOK_NOT_FOUND: &str = "Book not found";
pub const ERR_CART_ITEM_NOT_FOUND: &str = "Book is not in cart";
pub const ERR_RENTAL_NOT_FOUND: &str = "Rental not found";
pub const ERR_POST_NOT_FOUND: &str = "Post not found";
pub const ERR_COMMENT_NOT_FOUND: &str = "Comment not found";
