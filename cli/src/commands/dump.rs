use strata_config::Resolver;

pub fn handle_dump(config: &Resolver) {
    println!("{:#?}", config);
}
