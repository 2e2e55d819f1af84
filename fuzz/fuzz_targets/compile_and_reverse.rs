#![no_main]
use libfuzzer_sys::fuzz_target;
use routemap::{Options, Params, Resolver};

fuzz_target!(|data: (String, Vec<(String, String)>, Vec<(String, Vec<String>)>)| {
    let resolver = Resolver::with_options(Options::default());

    let mut params = data.1.into_iter().collect::<Params>();
    params.extend(data.2);

    let first = resolver.reverse(&data.0, &params);
    // a cached generator must behave exactly like a fresh one
    let second = resolver.reverse(&data.0, &params);
    assert_eq!(first, second);
});
