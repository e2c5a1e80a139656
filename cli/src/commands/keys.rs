use strata_config::Resolver;

pub fn handle_keys(config: &Resolver) {
    for key in config.all_keys() {
        println!("{}", key);
    }
}
