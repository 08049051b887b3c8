fn main() {
    jigsaw::run();
}
