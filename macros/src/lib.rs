//! Derive macros for the helpdesk store
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates helpers for action enums (commands/events)
//!
//! # Example
//!
//! ```ignore
//! use helpdesk_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum DeskAction {
//!     #[command]
//!     DeleteTicket { id: String },
//!
//!     #[event]
//!     TicketDeleted { id: String },
//! }
//!
//! // Generated methods:
//! assert!(DeskAction::DeleteTicket { id: "TKT-001".into() }.is_command());
//! assert!(DeskAction::TicketDeleted { id: "TKT-001".into() }.is_event());
//! assert_eq!(DeskAction::TicketDeleted { id: "TKT-001".into() }.event_type(), "TicketDeleted.v1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Variant};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_command()` - Returns true if this variant is a command
/// - `is_event()` - Returns true if this variant is an event
/// - `event_type()` - Returns the versioned event type name
///
/// # Attributes
///
/// - `#[command]` - Mark a variant as a command
/// - `#[event]` - Mark a variant as an event
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant has both `#[command]` and `#[event]` attributes
#[proc_macro_derive(Action, attributes(command, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut command_variants = Vec::new();
    let mut event_variants = Vec::new();

    for variant in &data_enum.variants {
        let is_command = has_attribute(&variant.attrs, "command");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_command && is_event {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[command] and #[event]",
            )
            .to_compile_error()
            .into();
        }

        if is_command {
            command_variants.push(variant);
        }

        if is_event {
            event_variants.push(variant);
        }
    }

    let is_command_arms = command_variants
        .iter()
        .map(|variant| match_arm(variant, &quote! { true }));

    let is_event_arms = event_variants
        .iter()
        .map(|variant| match_arm(variant, &quote! { true }));

    let event_type_arms = event_variants.iter().map(|variant| {
        let type_name = format!("{}.v1", variant.ident);
        match_arm(variant, &quote! { #type_name })
    });

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is a command
            #[must_use]
            pub const fn is_command(&self) -> bool {
                match self {
                    #(#is_command_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is an event
            #[must_use]
            pub const fn is_event(&self) -> bool {
                match self {
                    #(#is_event_arms)*
                    _ => false,
                }
            }

            /// Returns the event type name
            ///
            /// Only events have type names. Commands return "unknown".
            #[must_use]
            pub const fn event_type(&self) -> &'static str {
                match self {
                    #(#event_type_arms)*
                    _ => "unknown",
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Builds `Self::Variant { .. } => body,` with the pattern shape the variant needs
fn match_arm(variant: &Variant, body: &TokenStream2) -> TokenStream2 {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } => #body, },
        Fields::Unnamed(_) => quote! { Self::#ident(..) => #body, },
        Fields::Unit => quote! { Self::#ident => #body, },
    }
}

fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
