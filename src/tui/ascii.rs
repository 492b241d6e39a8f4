pub const LOGO: [&str; 4] = [
    r" _          _       _               ",
    r"| |___ __ _(_)_ __ | |_ ___  _ _  ___",
    r"|  _\ V  V / | '  \|  _/ _ \| ' \/ -_)",
    r" \__|\_/\_/|_|_||_| \__\___/|_||_\___|",
];
