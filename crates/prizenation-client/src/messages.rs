//! Fallback messages shown when the backend gives no `detail`.

pub const ADD_TO_CART: &str = "Failed to add to cart";
pub const UPDATE_CART: &str = "Failed to update cart";
pub const CLEAR_CART: &str = "Failed to clear cart";
pub const APPLY_COUPON: &str = "Invalid coupon code";
pub const CHECKOUT: &str = "Checkout failed";
pub const SAVE_COMPETITION: &str = "Failed to save competition";
pub const DELETE_COMPETITION: &str = "Failed to delete competition";
pub const UPLOAD: &str = "Failed to upload file. Please try again.";
pub const UPDATE_THEME: &str = "Failed to update theme";
pub const LOGIN: &str = "Login failed";
pub const REGISTER: &str = "Registration failed";
pub const LOAD_ENTRIES: &str = "Failed to load entries";
pub const FIND_WINNER: &str = "Search failed. Please try again.";
pub const MARK_WINNER: &str = "Failed to mark winner. Please try again.";
pub const LOAD: &str = "Failed to load data";
