// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Procedural macros for ktest.
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{
    Error, Expr, ExprLit, FnArg, ItemFn, Lit, Meta, Path, Token, parse::Parser,
    parse_macro_input, punctuated::Punctuated,
};

/// Options accepted by `#[def_test(...)]`.
#[derive(Default)]
struct TestArgs {
    suite: Option<Path>,
    name: Option<String>,
    ignore: bool,
    should_fault: bool,
}

impl TestArgs {
    fn parse(attr: TokenStream) -> syn::Result<Self> {
        let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse(attr)?;
        let mut args = TestArgs::default();
        for meta in metas {
            match meta {
                Meta::Path(path) if path.is_ident("ignore") => args.ignore = true,
                Meta::Path(path) if path.is_ident("should_fault") => args.should_fault = true,
                Meta::Path(path) => {
                    if args.suite.is_some() {
                        return Err(Error::new_spanned(path, "the suite is given twice"));
                    }
                    args.suite = Some(path);
                }
                Meta::NameValue(nv) if nv.path.is_ident("name") => match nv.value {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) => args.name = Some(s.value()),
                    other => return Err(Error::new_spanned(other, "expect a string literal")),
                },
                other => {
                    return Err(Error::new_spanned(
                        other,
                        "expect a suite type, `ignore`, `should_fault` or `name = \"..\"`",
                    ));
                }
            }
        }
        Ok(args)
    }
}

/// Marks a function as a unit test and registers it.
///
/// # Example
///
/// ```rust,ignore
/// use ktest::{UnitTest, def_test};
///
/// #[def_test]
/// fn test_addition(t: &mut UnitTest) {
///     ktest::assert_eq!(t, 2 + 2, 4);
/// }
///
/// #[def_test(Counter)]
/// fn test_countdown(suite: &mut Counter, t: &mut UnitTest) {
///     ktest::assert_nonzero!(t, suite.value);
/// }
/// ```
///
/// The function may take no arguments, the running test, or the suite
/// instance and the running test.
///
/// # Attributes
/// - `#[def_test]` - Test in the default suite
/// - `#[def_test(Suite)]` - Test in a suite registered with `register_suite!`
/// - `#[def_test(ignore)]` - Test will be skipped
/// - `#[def_test(should_fault)]` - Test passes only if its body faults
/// - `#[def_test(name = "..")]` - Reported name, defaults to the function name
#[proc_macro_attribute]
pub fn def_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let args = match TestArgs::parse(attr) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };
    match generate_function_test(args, input) {
        Ok(output) => output.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate test code for a single function
fn generate_function_test(args: TestArgs, input: ItemFn) -> syn::Result<TokenStream2> {
    let fn_name = &input.sig.ident;
    let vis = &input.vis;

    if !matches!(input.sig.output, syn::ReturnType::Default) {
        return Err(Error::new_spanned(
            &input.sig.output,
            "expect no return value for the test function",
        ));
    }
    if input.sig.asyncness.is_some() || !input.sig.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.sig,
            "expect a plain, non-generic, synchronous function",
        ));
    }
    if let Some(receiver) = input
        .sig
        .inputs
        .iter()
        .find(|arg| matches!(arg, FnArg::Receiver(_)))
    {
        return Err(Error::new_spanned(receiver, "expect a free function"));
    }

    let suite = match &args.suite {
        Some(path) => quote!(#path),
        None => quote!(::ktest::DefaultSuite),
    };

    let call = match input.sig.inputs.len() {
        0 => quote! { #fn_name() },
        1 => quote! { #fn_name(t) },
        2 => quote! {
            match ::ktest::downcast_suite::<#suite>(suite) {
                ::core::option::Option::Some(suite) => #fn_name(suite, t),
                ::core::option::Option::None => {
                    t.record_error(::ktest::KtestError::SuiteMismatch)
                }
            }
        },
        _ => {
            return Err(Error::new_spanned(
                &input.sig.inputs,
                "expect at most two arguments: the suite and the running test",
            ));
        }
    };

    // Generate a unique identifier for the test descriptor
    let descriptor_name = format_ident!(
        "__KTEST_DESCRIPTOR_{}",
        fn_name.to_string().to_uppercase(),
        span = Span::call_site()
    );
    let name_str = args.name.unwrap_or_else(|| fn_name.to_string());
    let ignore = args.ignore;
    let should_fault = args.should_fault;

    // The descriptor lives in a static; the distributed slice entry hands it
    // to the registry on first use.
    Ok(quote! {
        #input

        #[allow(non_upper_case_globals)]
        #vis static #descriptor_name: ::ktest::TestDescriptor = {
            #[allow(unused_variables)]
            fn __ktest_body(suite: &mut dyn ::ktest::TestSuite, t: &mut ::ktest::UnitTest) {
                #call
            }

            ::ktest::TestDescriptor::new(
                #name_str,
                <#suite as ::ktest::SuiteType>::descriptor,
                ::core::file!(),
                ::core::line!(),
                __ktest_body,
                ::ktest::TestFlags::new(#ignore, #should_fault),
            )
        };

        const _: () = {
            #[::ktest::__private::distributed_slice(::ktest::REGISTRATIONS)]
            #[linkme(crate = ::ktest::__private::linkme)]
            fn __ktest_register() -> &'static ::ktest::TestDescriptor {
                &#descriptor_name
            }
        };
    })
}
