fn main() {
    ember_run::game::run();
}
