diesel::table! {
    postcodes (id) {
        id -> Int4,
        #[max_length = 20]
        postcode -> Varchar,
        latitude -> Float8,
        longitude -> Float8,
    }
}
