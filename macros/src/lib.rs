use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn, LitStr};

/// Test attribute shared by the rxsignal test suite.
///
/// - `#[rxsignal_macro::test]` on a plain `fn` expands to `#[test]`.
/// - `#[rxsignal_macro::test]` on an `async fn` runs it on a current-thread
///   tokio runtime.
/// - `#[rxsignal_macro::test(shared)]` on an `async fn` runs it on a
///   multi-threaded tokio runtime, for tests that race producers against
///   subscribers.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);
  let is_async = input.sig.asyncness.is_some();
  let args = proc_macro2::TokenStream::from(attr);

  if args.is_empty() {
    let native = if is_async { quote!(tokio::test) } else { quote!(test) };
    return TokenStream::from(quote! {
      #[#native]
      #input
    });
  }

  if !is_async {
    return compile_error(
      args.span(),
      "runtime flavors only apply to async tests; use #[rxsignal_macro::test] on a plain fn",
    );
  }

  let flavor = if let Ok(ident) = syn::parse2::<Ident>(args.clone()) {
    flavor_of(&ident.to_string())
  } else if let Ok(lit) = syn::parse2::<LitStr>(args.clone()) {
    flavor_of(&lit.value())
  } else {
    None
  };

  match flavor {
    Some(flavor) => TokenStream::from(quote! {
      #[tokio::test(#flavor)]
      #input
    }),
    None => compile_error(
      args.span(),
      "expected #[rxsignal_macro::test], #[rxsignal_macro::test(local)] or \
       #[rxsignal_macro::test(shared)]",
    ),
  }
}

fn flavor_of(name: &str) -> Option<proc_macro2::TokenStream> {
  match name {
    "local" => Some(quote!(flavor = "current_thread")),
    "shared" => Some(quote!(flavor = "multi_thread", worker_threads = 4)),
    _ => None,
  }
}

fn compile_error(span: proc_macro2::Span, msg: &str) -> TokenStream {
  TokenStream::from(syn::Error::new(span, msg).to_compile_error())
}
