mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the original function with the suffix `_docs`.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates two new structs for the model: `Create<X>Input` with the writable
/// fields verbatim, and `Update<X>Input` with every field wrapped in an Option.
/// Fields with #[serde(skip_deserializing)] or #[serde(skip)] are left out of both.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
