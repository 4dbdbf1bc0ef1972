fn main() {
    platformer_game::game::run();
}
