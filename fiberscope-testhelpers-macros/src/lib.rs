//! Attribute macro behind `#[fiberscope_testhelpers::test]`.

use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    // Attributes, visibility and qualifiers (`async`, `unsafe`) before `fn`.
    struct Prelude {
        items: Any<Cons<Except<KFn>, TokenTree>>,
    }

    // Generics, arguments and return type between the name and the body.
    struct Signature {
        items: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct TestFn {
        prelude: Prelude,
        _fn: KFn,
        name: Ident,
        signature: Signature,
        body: BraceGroup,
    }
}

impl quote::ToTokens for Prelude {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Signature {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

/// Marks a test and installs the shared tracing subscriber before its body runs.
///
/// ```ignore
/// #[fiberscope_testhelpers::test]
/// fn resolves_backed_element() {
///     // FIBERSCOPE_LOG=trace shows navigation decisions
/// }
///
/// #[fiberscope_testhelpers::test(tokio::test)]
/// async fn awaits_geometry() {}
/// ```
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let item = TokenStream::from(item);
    let mut tokens = item.to_token_iter();
    let test_fn = match tokens.parse::<TestFn>() {
        Ok(test_fn) => test_fn,
        Err(_) => {
            return quote::quote! {
                ::core::compile_error!("#[fiberscope_testhelpers::test] expects a function");
            }
            .into();
        }
    };

    let TestFn {
        prelude,
        _fn,
        name,
        signature,
        body,
    } = test_fn;

    let harness = if attr.is_empty() {
        quote::quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = TokenStream::from(attr);
        quote::quote! { #[#attr] }
    };
    let body = body.0.stream();

    quote::quote! {
        #harness
        #prelude fn #name #signature {
            ::fiberscope_testhelpers::setup();

            #body
        }
    }
    .into()
}
