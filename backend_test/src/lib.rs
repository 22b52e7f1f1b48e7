use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, spanned::Spanned, FnArg, GenericArgument, Ident, ItemFn, Pat, PathArguments,
    Signature, Type,
};

/// Transform an asynchronous test into a synchronous one, inject dependencies,
/// and ensure that the test's database is dropped regardless of how the test
/// terminates. Each test gets its own randomly named database, already set up
/// with indexes and ID counters.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`],
/// [`mongodb::Database`], and [`crate::model::mongodb::Coll<T>`]. Any
/// combination may be taken, including collections alone, but `Client` and
/// `Database` must come before any collections.
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    if let Some(arg) = TokenStream2::from(args).into_iter().next() {
        return syn::Error::new(arg.span(), "`backend_test` takes no arguments")
            .into_compile_error()
            .into();
    }
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract type information and reject invalid function signatures.
    let (test_args, collection_idents, collection_types) = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();
    let call = test_call(&new_name, &test_args, &collection_idents);

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// Test setup.
            async fn setup() -> (rocket::local::asynchronous::Client, mongodb::Database) {
                let db_client = crate::db_client().await;
                let db_name = crate::database();
                let rocket_client = rocket::local::asynchronous::Client::tracked(
                    crate::rocket_for_db(db_client.clone(), &db_name).await,
                )
                .await
                .unwrap();
                let db = db_client.database(&db_name);

                (rocket_client, db)
            }

            /// The test itself.
            #item_fn

            /// Test cleanup.
            async fn cleanup(db: mongodb::Database) {
                db.drop(None).await.unwrap();
            }

            // Create an async runtime. We need a separate one for inside and
            // outside the `catch_unwind`.
            let outer_runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("test-setup-cleanup")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();
            let inner_runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            // Run the setup.
            let (rocket_client, db) = outer_runtime.block_on(setup());

            // Run the test, catching any panics.
            // Use mutexes to safely transfer `!UnwindSafe` data.
            let client_mutex = std::sync::Mutex::new(rocket_client);
            let db_mutex = std::sync::Mutex::new(db.clone());
            let runtime_mutex = std::sync::Mutex::new(inner_runtime);
            let result = std::panic::catch_unwind(|| {
                let rocket_client = client_mutex.into_inner().unwrap();
                let db = db_mutex.into_inner().unwrap();
                let runtime = runtime_mutex.into_inner().unwrap();

                #(
                    let #collection_idents = crate::model::mongodb::Coll::<#collection_types>::from_db(&db);
                )*

                runtime.block_on(#call);
            });

            // Run the cleanup.
            outer_runtime.block_on(cleanup(db));

            // If the test panicked, re-raise the panic.
            if let Err(cause) = result {
                std::panic::panic_any(cause);
            }
        }
    }
    .into()
}

/// Call the renamed test with its injected arguments, in declaration order.
fn test_call(name: &Ident, test_args: &[TokenStream2], collection_idents: &[Ident]) -> TokenStream2 {
    quote! { #name(#(#test_args,)* #(#collection_idents,)*) }
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
#[allow(clippy::type_complexity)]
fn check_sig(sig: Signature) -> Result<(Vec<TokenStream2>, Vec<Ident>, Vec<Ident>), syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut has_db = false;
    let mut args = vec![];
    let mut collection_idents = vec![];
    let mut collection_types = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let Pat::Ident(pat_ident) = &*pat_type.pat {
                if let Type::Path(type_path) = &*pat_type.ty {
                    if let Some(type_ident) = type_path.path.get_ident() {
                        if type_ident == "Client" {
                            if has_client {
                                return Err(syn::Error::new(input.span(), "Test cannot accept more than one `rocket::local::asynchronous::Client`"));
                            }
                            has_client = true;
                            args.push(quote! { rocket_client });
                            continue;
                        } else if type_ident == "Database" {
                            if has_db {
                                return Err(syn::Error::new(
                                    input.span(),
                                    "Test cannot accept more than one `mongodb::Database`",
                                ));
                            }
                            has_db = true;
                            args.push(quote! { db });
                            continue;
                        }
                    } else {
                        // Valid as the last path segment for any type is itself
                        let possible_collection = type_path.path.segments.last().unwrap();
                        if possible_collection.ident == "Coll" {
                            if let PathArguments::AngleBracketed(generics) =
                                &possible_collection.arguments
                            {
                                if let Some(GenericArgument::Type(Type::Path(type_path))) =
                                    generics.args.first()
                                {
                                    if let Some(type_ident) = type_path.path.get_ident() {
                                        collection_idents.push(pat_ident.ident.clone());
                                        collection_types.push(type_ident.clone());
                                        continue;
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client`, `db_ident: Database` or `collection_ident: Coll<T>`",
        ));
    }

    Ok((args, collection_idents, collection_types))
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn call_for(item_fn: ItemFn) -> String {
        let (test_args, collection_idents, _) = check_sig(item_fn.sig).unwrap();
        test_call(&format_ident!("t_fut"), &test_args, &collection_idents).to_string()
    }

    #[test]
    fn collections_only() {
        let item_fn: ItemFn = parse_quote! {
            async fn t(questions: Coll<Question>, counters: Coll<Counter>) {}
        };
        let call = call_for(item_fn);
        assert_eq!(call, quote! { t_fut(questions, counters,) }.to_string());
        syn::parse_str::<syn::ExprCall>(&call).unwrap();
    }

    #[test]
    fn client_database_and_collections() {
        let item_fn: ItemFn = parse_quote! {
            async fn t(client: Client, db: Database, questions: Coll<Question>) {}
        };
        let call = call_for(item_fn);
        assert_eq!(
            call,
            quote! { t_fut(rocket_client, db, questions,) }.to_string()
        );
        syn::parse_str::<syn::ExprCall>(&call).unwrap();
    }

    #[test]
    fn no_arguments() {
        let item_fn: ItemFn = parse_quote! { async fn t() {} };
        let call = call_for(item_fn);
        assert_eq!(call, quote! { t_fut() }.to_string());
        syn::parse_str::<syn::ExprCall>(&call).unwrap();
    }

    #[test]
    fn rejected_signatures() {
        let not_async: ItemFn = parse_quote! { fn t(client: Client) {} };
        assert!(check_sig(not_async.sig).is_err());

        let two_clients: ItemFn = parse_quote! { async fn t(a: Client, b: Client) {} };
        assert!(check_sig(two_clients.sig).is_err());

        let unknown: ItemFn = parse_quote! { async fn t(n: u32) {} };
        assert!(check_sig(unknown.sig).is_err());
    }
}
